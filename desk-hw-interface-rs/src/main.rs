//! desk-hw-interface
//!
//! Firmware for the desk-8080 control surface on the Raspberry Pi Pico 2.
//! Wires the library crates to the RP2350 peripherals and splits the work
//! over three execution contexts:
//!
//! 1. **Interrupt executor (core 0, SWI_IRQ_0)**: one task per rotary
//!    encoder. Every edge on either lead wakes the task, which steps the
//!    latch decoder and publishes the state to a `SharedEncoder` static.
//! 2. **Thread executor (core 0)**: the control loop. Blinks the indicator
//!    until the engine is attached, then draws the active tab, dispatches
//!    knob turns, envelope sliders and button clicks, and exchanges JSON
//!    lines with the engine over UART0.
//! 3. **Core 1**: the audio loop. Reads 4-byte frames from a USB CDC-ACM
//!    endpoint and writes each one to both channels of the PIO I2S output,
//!    in lock-step. The USB device task shares this executor.
//!
//! The two planes share nothing but the encoder statics, which only the
//! interrupt executor writes.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, InterruptExecutor, Spawner};
use embassy_rp::adc::{self, Adc};
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::{DMA_CH0, I2C0, PIN_20, PIN_21, PIN_22, PIO0, UART0, USB};
use embassy_rp::pio::{self, Pio};
use embassy_rp::pio_programs::i2s::{PioI2sOut, PioI2sOutProgram};
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUart};
use embassy_rp::usb;
use embassy_time::{Delay, Instant};
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, UsbDevice};
use embedded_io::ErrorKind;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use desk_audio::{AudioConfig, AudioStreamer, FrameReader, PacketReader, PacketSource, SampleSink};
use desk_control::{ButtonLevels, ControlConfig, ControlInputs, ControlLoop, Link};
use desk_encoder::{EncoderPins, LatchMode, SharedEncoder};
use desk_oled_display::OledDriver;

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => adc::InterruptHandler;
    PIO0_IRQ_0 => pio::InterruptHandler<PIO0>;
    USBCTRL_IRQ => usb::InterruptHandler<USB>;
});

#[interrupt]
unsafe fn SWI_IRQ_0() {
    ENCODER_EXECUTOR.on_interrupt()
}

// ---------------------------------------------------------------------------
// Pin assignments
// ---------------------------------------------------------------------------
//
// | Signal            | Pin  | Notes                                    |
// |-------------------|------|------------------------------------------|
// | Engine UART0 TX   | GP0  | 115 200 baud, JSON lines                 |
// | Engine UART0 RX   | GP1  |                                          |
// | Link sense        | GP2  | tied to GP1, pull-down; high = attached  |
// | OLED SDA (I2C0)   | GP4  | SSD1306 at 0x3C                          |
// | OLED SCL (I2C0)   | GP5  |                                          |
// | Left encoder CLK  | GP8  | pull-up                                  |
// | Left encoder DT   | GP9  | pull-up                                  |
// | Right encoder CLK | GP10 | pull-up                                  |
// | Right encoder DT  | GP11 | pull-up                                  |
// | Left button       | GP12 | active low                               |
// | Right button      | GP13 | active low                               |
// | Indicator LED     | GP14 | blinks until the engine is attached      |
// | Main button       | GP15 | active low                               |
// | I2S data          | GP20 | PIO0 SM0                                 |
// | I2S bit clock     | GP21 |                                          |
// | I2S word select   | GP22 |                                          |
// | Sustain slider    | GP26 | ADC0                                     |
// | Decay slider      | GP27 | ADC1                                     |
// | Attack slider     | GP28 | ADC2                                     |
// | Audio stream      | USB  | CDC-ACM, big-endian i32 frames           |

const OLED_ADDRESS: u8 = 0x3C;
const ENGINE_BAUD: u32 = 115_200;
const USB_VID: u16 = 0xc0de;
const USB_PID: u16 = 0xcafe;
/// Largest full-speed bulk packet.
const USB_PACKET: usize = 64;

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

static LEFT_ENCODER: SharedEncoder = SharedEncoder::new();
static RIGHT_ENCODER: SharedEncoder = SharedEncoder::new();

static ENCODER_EXECUTOR: InterruptExecutor = InterruptExecutor::new();
static AUDIO_EXECUTOR: StaticCell<Executor> = StaticCell::new();
static mut CORE1_STACK: Stack<8192> = Stack::new();

static ENGINE_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static ENGINE_RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static USB_CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static CDC_STATE: StaticCell<State> = StaticCell::new();

// ---------------------------------------------------------------------------
// Peripheral adapters
// ---------------------------------------------------------------------------

type Encoder = EncoderPins<'static, Input<'static>, Input<'static>>;
type UsbDriver = usb::Driver<'static, USB>;
type Panel = ControlLoop<
    'static,
    EngineLink,
    OledDriver<I2c<'static, I2C0, i2c::Async>>,
    PanelInputs,
    Output<'static>,
    Delay,
>;

/// UART0 plus the sense input that tells whether the engine is attached.
struct EngineLink {
    uart: BufferedUart<'static, UART0>,
    sense: Input<'static>,
}

impl embedded_io::ErrorType for EngineLink {
    type Error = uart::Error;
}

impl embedded_io_async::Read for EngineLink {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, uart::Error> {
        embedded_io_async::Read::read(&mut self.uart, buf).await
    }
}

impl embedded_io_async::Write for EngineLink {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, uart::Error> {
        embedded_io_async::Write::write(&mut self.uart, buf).await
    }

    async fn flush(&mut self) -> Result<(), uart::Error> {
        embedded_io_async::Write::flush(&mut self.uart).await
    }
}

impl embedded_io::ReadReady for EngineLink {
    fn read_ready(&mut self) -> Result<bool, uart::Error> {
        embedded_io::ReadReady::read_ready(&mut self.uart)
    }
}

impl Link for EngineLink {
    fn is_live(&mut self) -> bool {
        self.sense.is_high()
    }
}

/// Envelope sliders, push buttons and the clock.
struct PanelInputs {
    adc: Adc<'static, adc::Async>,
    attack: adc::Channel<'static>,
    decay: adc::Channel<'static>,
    sustain: adc::Channel<'static>,
    main: Input<'static>,
    left: Input<'static>,
    right: Input<'static>,
}

impl ControlInputs for PanelInputs {
    type Error = adc::Error;

    async fn envelope(&mut self) -> Result<[u16; 3], adc::Error> {
        let attack = self.adc.read(&mut self.attack).await?;
        let decay = self.adc.read(&mut self.decay).await?;
        let sustain = self.adc.read(&mut self.sustain).await?;
        Ok([attack, decay, sustain])
    }

    fn buttons(&mut self) -> Result<ButtonLevels, adc::Error> {
        Ok(ButtonLevels {
            main: self.main.is_low(),
            left: self.left.is_low(),
            right: self.right.is_low(),
        })
    }

    fn now_ms(&mut self) -> u64 {
        Instant::now().as_millis()
    }
}

/// PIO I2S transmitter, one DMA transfer per stereo frame.
struct I2sSink {
    i2s: PioI2sOut<'static, PIO0, 0>,
    frame: [u32; 2],
}

impl SampleSink for I2sSink {
    type Error = core::convert::Infallible;

    async fn write_stereo(&mut self, left: i32, right: i32) -> Result<(), Self::Error> {
        self.frame = [left as u32, right as u32];
        self.i2s.write(&self.frame).await;
        Ok(())
    }
}

/// OUT endpoint of the CDC-ACM class that carries the audio stream.
struct AudioEndpoint {
    class: CdcAcmClass<'static, UsbDriver>,
}

impl PacketSource for AudioEndpoint {
    type Error = ErrorKind;

    async fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
        match self.class.read_packet(buf).await {
            Ok(n) => Ok(n),
            Err(EndpointError::Disabled) => {
                // Host gone; hold the output until it enumerates again.
                self.class.wait_connection().await;
                Err(ErrorKind::NotConnected)
            }
            Err(EndpointError::BufferOverflow) => Err(ErrorKind::InvalidData),
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Edge-driven decoding of one encoder.
#[embassy_executor::task(pool_size = 2)]
async fn encoder_task(mut encoder: Encoder, name: &'static str) {
    info!("{} encoder task started", name);
    match encoder.run().await {
        Ok(never) => match never {},
        Err(_) => error!("{} encoder stopped: pin error", name),
    }
}

/// The control plane.
#[embassy_executor::task]
async fn control_task(mut panel: Panel) {
    info!("control loop started");
    match panel.run().await {
        Ok(never) => match never {},
        Err(_) => error!("indicator pin failed, control loop stopped"),
    }
}

/// Enumeration and control requests of the USB device.
#[embassy_executor::task]
async fn usb_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

/// The audio plane, on core 1.
#[embassy_executor::task]
async fn audio_task(
    class: CdcAcmClass<'static, UsbDriver>,
    pio: PIO0,
    dma: DMA_CH0,
    data: PIN_20,
    bit_clock: PIN_21,
    lr_clock: PIN_22,
) {
    let config = AudioConfig::default();
    info!("audio config: {}", config);
    if let Err(e) = config.validate() {
        error!("audio plane disabled: {}", e);
        return;
    }

    let mut endpoint = AudioEndpoint { class };
    endpoint.class.wait_connection().await;
    info!("audio host attached");
    let mut reader = FrameReader::new(PacketReader::<_, USB_PACKET>::new(endpoint));

    // The first frame is assembled before the output is opened.
    let first = loop {
        match reader.read_frame().await {
            Ok(frame) => break frame,
            Err(_) => warn!("audio: failed to read first frame, retrying"),
        }
    };

    let Pio { mut common, sm0, .. } = Pio::new(pio, Irqs);
    let program = PioI2sOutProgram::new(&mut common);
    let i2s = PioI2sOut::new(
        &mut common,
        sm0,
        dma,
        data,
        bit_clock,
        lr_clock,
        config.sample_rate_hz,
        config.bits_per_sample as u32,
        2,
        &program,
    );

    let sink = I2sSink { i2s, frame: [0; 2] };
    AudioStreamer::new(reader, sink, first).run().await
}

/// Build the USB device with one CDC-ACM function for the audio stream.
fn audio_usb(peripheral: USB) -> (UsbDevice<'static, UsbDriver>, CdcAcmClass<'static, UsbDriver>) {
    let driver = usb::Driver::new(peripheral, Irqs);

    let mut config = embassy_usb::Config::new(USB_VID, USB_PID);
    config.manufacturer = Some("desk-8080");
    config.product = Some("desk-8080 audio");
    config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        config,
        USB_CONFIG_DESCRIPTOR.init([0; 256]),
        USB_BOS_DESCRIPTOR.init([0; 256]),
        &mut [], // no msos descriptors
        USB_CONTROL_BUF.init([0; 64]),
    );
    let class = CdcAcmClass::new(&mut builder, CDC_STATE.init(State::new()), USB_PACKET as u16);
    (builder.build(), class)
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("desk-hw-interface starting");

    // Audio plane on core 1

    let usb0 = p.USB;
    let (pio0, dma0) = (p.PIO0, p.DMA_CH0);
    let (i2s_data, i2s_bclk, i2s_lrclk) = (p.PIN_20, p.PIN_21, p.PIN_22);
    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || {
            let executor = AUDIO_EXECUTOR.init(Executor::new());
            executor.run(|spawner| {
                // The USB interrupt is enabled on the core that creates the driver.
                let (device, class) = audio_usb(usb0);
                unwrap!(spawner.spawn(usb_task(device)));
                unwrap!(spawner.spawn(audio_task(
                    class, pio0, dma0, i2s_data, i2s_bclk, i2s_lrclk
                )))
            });
        },
    );

    // Encoders on the interrupt executor

    interrupt::SWI_IRQ_0.set_priority(Priority::P2);
    let encoder_spawner = ENCODER_EXECUTOR.start(interrupt::SWI_IRQ_0);

    let left = EncoderPins::new(
        Input::new(p.PIN_9, Pull::Up),
        Input::new(p.PIN_8, Pull::Up),
        &LEFT_ENCODER,
        LatchMode::Four0,
    );
    let right = EncoderPins::new(
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_10, Pull::Up),
        &RIGHT_ENCODER,
        LatchMode::Four0,
    );
    unwrap!(encoder_spawner.spawn(encoder_task(left, "left")));
    unwrap!(encoder_spawner.spawn(encoder_task(right, "right")));

    // Control plane

    let mut engine_config = uart::Config::default();
    engine_config.baudrate = ENGINE_BAUD;
    let engine = EngineLink {
        uart: BufferedUart::new(
            p.UART0,
            Irqs,
            p.PIN_0,
            p.PIN_1,
            ENGINE_TX_BUF.init([0; 256]),
            ENGINE_RX_BUF.init([0; 512]),
            engine_config,
        ),
        sense: Input::new(p.PIN_2, Pull::Down),
    };

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_5, // SCL
        p.PIN_4, // SDA
        Irqs,
        i2c::Config::default(),
    );
    let mut oled = OledDriver::new(i2c, OLED_ADDRESS);
    if let Err(e) = oled.init().await {
        // The panel still works without a screen; flushes will fail quietly.
        error!("OLED init failed: {}", e);
    }

    let inputs = PanelInputs {
        adc: Adc::new(p.ADC, Irqs, adc::Config::default()),
        attack: adc::Channel::new_pin(p.PIN_28, Pull::None),
        decay: adc::Channel::new_pin(p.PIN_27, Pull::None),
        sustain: adc::Channel::new_pin(p.PIN_26, Pull::None),
        main: Input::new(p.PIN_15, Pull::Up),
        left: Input::new(p.PIN_12, Pull::Up),
        right: Input::new(p.PIN_13, Pull::Up),
    };

    let indicator = Output::new(p.PIN_14, Level::Low);

    let panel = ControlLoop::new(
        engine,
        oled,
        inputs,
        indicator,
        Delay,
        [&LEFT_ENCODER, &RIGHT_ENCODER],
        ControlConfig::default(),
    );
    unwrap!(spawner.spawn(control_task(panel)));

    info!("All tasks spawned");
}
