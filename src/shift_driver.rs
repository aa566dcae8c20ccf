//! Dual-channel shift chain driver.
//!
//! Drives two 8-output serial-in, parallel-out chains (74HC595 style) that
//! share one clock, one latch and one output-enable line but have separate
//! data lines. Both chains are clocked in lock-step, so a 16-light pattern is
//! transmitted in eight clock pulses.
//!
//! # Chain Signals
//!
//! - **CLK**: Shift clock, rising edge shifts the data line into the chain
//! - **DATA_A / DATA_B**: Serial data for the low and high chain
//! - **LATCH**: Rising edge copies the shift stage to the outputs
//! - **OE_N**: Active-low output enable, high blanks every output while
//!   keeping the latched data

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::OutputPin;

use crate::config::ShiftTiming;
use crate::sequencer::ShiftFrame;

/// Anything that can show a [`ShiftFrame`] on the light chains.
pub trait FrameOutput {
    type Error;

    /// Transmits one byte per chain and latches both atomically.
    fn shift_out_pair(&mut self, byte_a: u8, byte_b: u8) -> Result<(), Self::Error>;

    /// Blanks (`false`) or restores (`true`) the physical outputs without
    /// touching the latched data.
    fn set_output_enabled(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Transmits a frame, low byte on chain A and high byte on chain B.
    fn show(&mut self, frame: ShiftFrame) -> Result<(), Self::Error> {
        self.shift_out_pair(frame.low, frame.high)
    }
}

/// Driver for two lock-stepped shift chains.
pub struct DualChannelShiftDriver<CLK, DA, DB, LATCH, OE, DELAY> {
    /// Shared shift clock
    clock: CLK,
    /// Serial data for chain A
    data_a: DA,
    /// Serial data for chain B
    data_b: DB,
    /// Shared storage latch
    latch: LATCH,
    /// Shared active-low output enable
    output_enable_n: OE,
    delay: DELAY,
    timing: ShiftTiming,
}

impl<CLK, DA, DB, LATCH, OE, DELAY, E> DualChannelShiftDriver<CLK, DA, DB, LATCH, OE, DELAY>
where
    CLK: OutputPin<Error = E>,
    DA: OutputPin<Error = E>,
    DB: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
    OE: OutputPin<Error = E>,
    DELAY: DelayUs<u32>,
{
    /// Creates a new driver. No pin is touched until [`initialize`].
    ///
    /// # Arguments
    ///
    /// * `clock` - Shift clock output
    /// * `data_a` - Data output for chain A (low byte)
    /// * `data_b` - Data output for chain B (high byte)
    /// * `latch` - Storage latch output
    /// * `output_enable_n` - Active-low output enable
    /// * `delay` - Blocking microsecond delay
    /// * `timing` - Edge timing
    ///
    /// [`initialize`]: Self::initialize
    pub fn new(
        clock: CLK,
        data_a: DA,
        data_b: DB,
        latch: LATCH,
        output_enable_n: OE,
        delay: DELAY,
        timing: ShiftTiming,
    ) -> Self {
        Self {
            clock,
            data_a,
            data_b,
            latch,
            output_enable_n,
            delay,
            timing,
        }
    }

    /// Puts every line in its idle state with the outputs blanked.
    ///
    /// Clock, data and latch go low; OE_N goes high.
    pub fn initialize(&mut self) -> Result<(), E> {
        self.clock.set_low()?;
        self.data_a.set_low()?;
        self.data_b.set_low()?;
        self.latch.set_low()?;
        self.output_enable_n.set_high()
    }

    /// Shifts `byte_a` into chain A and `byte_b` into chain B, LSB first,
    /// then latches both.
    ///
    /// Bit `i` of both bytes is presented on the data lines before the same
    /// clock pulse, so the chains never drift apart.
    pub fn shift_out_pair(&mut self, mut byte_a: u8, mut byte_b: u8) -> Result<(), E> {
        for _ in 0..8 {
            self.data_a.set_state((byte_a & 1 != 0).into())?;
            self.data_b.set_state((byte_b & 1 != 0).into())?;
            self.pulse_clock()?;
            byte_a >>= 1;
            byte_b >>= 1;
        }
        self.pulse_latch()
    }

    /// Drives OE_N low to show the latched pattern or high to blank it.
    pub fn set_output_enabled(&mut self, on: bool) -> Result<(), E> {
        self.output_enable_n.set_state((!on).into())
    }

    fn pulse_clock(&mut self) -> Result<(), E> {
        self.delay.delay_us(self.timing.bit_delay_us);
        self.clock.set_high()?;
        self.delay.delay_us(self.timing.bit_delay_us);
        self.clock.set_low()
    }

    fn pulse_latch(&mut self) -> Result<(), E> {
        self.delay.delay_us(self.timing.bit_delay_us);
        self.latch.set_high()?;
        self.delay.delay_us(self.timing.bit_delay_us);
        self.latch.set_low()
    }
}

impl<CLK, DA, DB, LATCH, OE, DELAY, E> FrameOutput
    for DualChannelShiftDriver<CLK, DA, DB, LATCH, OE, DELAY>
where
    CLK: OutputPin<Error = E>,
    DA: OutputPin<Error = E>,
    DB: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
    OE: OutputPin<Error = E>,
    DELAY: DelayUs<u32>,
{
    type Error = E;

    fn shift_out_pair(&mut self, byte_a: u8, byte_b: u8) -> Result<(), E> {
        DualChannelShiftDriver::shift_out_pair(self, byte_a, byte_b)
    }

    fn set_output_enabled(&mut self, on: bool) -> Result<(), E> {
        DualChannelShiftDriver::set_output_enabled(self, on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::delay::MockNoop;
    use embedded_hal_mock::pin::{Mock as PinMock, State, Transaction};

    fn level(bit: bool) -> State {
        if bit { State::High } else { State::Low }
    }

    /// One `set` per bit, LSB first.
    fn data_transactions(byte: u8) -> Vec<Transaction> {
        (0..8)
            .map(|i| Transaction::set(level(byte >> i & 1 != 0)))
            .collect()
    }

    fn pulses(count: usize) -> Vec<Transaction> {
        (0..count)
            .flat_map(|_| [Transaction::set(State::High), Transaction::set(State::Low)])
            .collect()
    }

    #[test]
    fn initialize_idles_lines_and_blanks_outputs() {
        let low = [Transaction::set(State::Low)];
        let mut clock = PinMock::new(&low);
        let mut data_a = PinMock::new(&low);
        let mut data_b = PinMock::new(&low);
        let mut latch = PinMock::new(&low);
        let mut oe_n = PinMock::new(&[Transaction::set(State::High)]);

        let mut driver = DualChannelShiftDriver::new(
            clock.clone(),
            data_a.clone(),
            data_b.clone(),
            latch.clone(),
            oe_n.clone(),
            MockNoop::new(),
            ShiftTiming::DEFAULT,
        );
        driver.initialize().unwrap();

        clock.done();
        data_a.done();
        data_b.done();
        latch.done();
        oe_n.done();
    }

    #[test]
    fn shift_out_pair_clocks_both_chains_lsb_first_then_latches_once() {
        let byte_a = 0b1100_0000;
        let byte_b = 0b0000_0101;

        let mut clock = PinMock::new(&pulses(8));
        let mut data_a = PinMock::new(&data_transactions(byte_a));
        let mut data_b = PinMock::new(&data_transactions(byte_b));
        let mut latch = PinMock::new(&pulses(1));
        let mut oe_n = PinMock::new(&[] as &[Transaction]);

        let mut driver = DualChannelShiftDriver::new(
            clock.clone(),
            data_a.clone(),
            data_b.clone(),
            latch.clone(),
            oe_n.clone(),
            MockNoop::new(),
            ShiftTiming::DEFAULT,
        );
        driver.shift_out_pair(byte_a, byte_b).unwrap();

        clock.done();
        data_a.done();
        data_b.done();
        latch.done();
        oe_n.done();
    }

    #[test]
    fn output_enable_is_active_low() {
        let mut oe_n = PinMock::new(&[
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ]);
        let mut idle = PinMock::new(&[] as &[Transaction]);

        let mut driver = DualChannelShiftDriver::new(
            idle.clone(),
            idle.clone(),
            idle.clone(),
            idle.clone(),
            oe_n.clone(),
            MockNoop::new(),
            ShiftTiming::DEFAULT,
        );
        driver.set_output_enabled(false).unwrap();
        driver.set_output_enabled(true).unwrap();

        oe_n.done();
        idle.done();
    }

    #[test]
    fn show_sends_low_byte_on_chain_a() {
        let frame = ShiftFrame { low: 0xC0, high: 0x00 };

        let mut clock = PinMock::new(&pulses(8));
        let mut data_a = PinMock::new(&data_transactions(0xC0));
        let mut data_b = PinMock::new(&data_transactions(0x00));
        let mut latch = PinMock::new(&pulses(1));
        let mut oe_n = PinMock::new(&[] as &[Transaction]);

        let mut driver = DualChannelShiftDriver::new(
            clock.clone(),
            data_a.clone(),
            data_b.clone(),
            latch.clone(),
            oe_n.clone(),
            MockNoop::new(),
            ShiftTiming { bit_delay_us: 1 },
        );
        driver.show(frame).unwrap();

        clock.done();
        data_a.done();
        data_b.done();
        latch.done();
        oe_n.done();
    }

    /// Pin or delay activity on the chain lines, in call order.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Trace {
        Pin(&'static str, bool),
        Delay(u32),
    }

    type Traces = std::rc::Rc<std::cell::RefCell<Vec<Trace>>>;

    struct TracePin(&'static str, Traces);

    impl OutputPin for TracePin {
        type Error = core::convert::Infallible;

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.1.borrow_mut().push(Trace::Pin(self.0, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.1.borrow_mut().push(Trace::Pin(self.0, true));
            Ok(())
        }
    }

    struct TraceDelay(Traces);

    impl DelayUs<u32> for TraceDelay {
        fn delay_us(&mut self, us: u32) {
            self.0.borrow_mut().push(Trace::Delay(us));
        }
    }

    #[test]
    fn delay_surrounds_every_clock_and_latch_rising_edge() {
        let traces: Traces = Default::default();
        let pin = |name| TracePin(name, traces.clone());
        let timing = ShiftTiming { bit_delay_us: 7 };
        let mut driver = DualChannelShiftDriver::new(
            pin("CLK"),
            pin("A"),
            pin("B"),
            pin("LATCH"),
            pin("OE_N"),
            TraceDelay(traces.clone()),
            timing,
        );
        driver.shift_out_pair(0x01, 0x80).unwrap();

        let d = Trace::Delay(timing.bit_delay_us);
        let mut expected = Vec::new();
        for bit in 0..8 {
            expected.extend([
                Trace::Pin("A", bit == 0),
                Trace::Pin("B", bit == 7),
                d,
                Trace::Pin("CLK", true),
                d,
                Trace::Pin("CLK", false),
            ]);
        }
        expected.extend([d, Trace::Pin("LATCH", true), d, Trace::Pin("LATCH", false)]);

        let traces = traces.borrow();
        assert_eq!(*traces, expected);
        assert_eq!(traces.iter().filter(|t| **t == d).count(), 18);
    }
}
