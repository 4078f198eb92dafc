use embassy_rp::{
    bind_interrupts,
    peripherals::{PIN_8, PIN_9, UART1},
    uart::{self, BufferedInterruptHandler, BufferedUart, BufferedUartTx},
    Peri,
};
use fc_firmware::consts::TELEMETRY_BAUDRATE;
use static_cell::StaticCell;

bind_interrupts!(struct UartIrq {
  UART1_IRQ => BufferedInterruptHandler<UART1>;
});

const TELEMETRY_BUFFER_SIZE: usize = 1024;

pub fn setup_telemetry_uart(
    tx_pin: Peri<'static, PIN_8>,
    rx_pin: Peri<'static, PIN_9>,
    uart: Peri<'static, UART1>,
) -> BufferedUartTx {
    static TX_BUF: StaticCell<[u8; TELEMETRY_BUFFER_SIZE]> = StaticCell::new();
    let tx_buf = &mut TX_BUF.init([0; TELEMETRY_BUFFER_SIZE])[..];
    static RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
    let rx_buf = &mut RX_BUF.init([0; 16])[..];

    let mut uart_config = uart::Config::default();
    uart_config.baudrate = TELEMETRY_BAUDRATE;
    let uart = BufferedUart::new(uart, tx_pin, rx_pin, UartIrq, tx_buf, rx_buf, uart_config);
    let (tx, _rx) = uart.split();

    tx
}
