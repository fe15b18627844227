//! SPI link to the FPGA servo controller.
//!
//! One frame is one chip-select window: CS is asserted, the whole frame goes out in a single
//! blocking write, the bus is flushed, and CS is released. CS is released even when the write
//! fails; the failed frame is reported and never resent or completed.
//!
//! The SPI bus is passed in as `&mut` to [`ServoLink::send`] so that other devices can share it.

use embedded_hal::{
    digital::OutputPin,
    spi::{Error as _, ErrorKind, SpiBus},
};

use crate::protocol::Frame;

/// FPGA link bound to an active-low chip-select line.
pub struct ServoLink<CS> {
    cs: CS,
}

impl<CS: OutputPin> ServoLink<CS> {
    /// Construct the link and drive chip-select to its inactive (high) state.
    pub fn new(mut cs: CS) -> Result<Self, ErrorKind> {
        cs.set_high().map_err(|_| ErrorKind::ChipSelectFault)?;
        Ok(Self { cs })
    }

    /// Release the chip-select pin.
    pub fn free(self) -> CS {
        self.cs
    }

    /// Transmit one frame inside a single chip-select window.
    pub fn send<SPI>(&mut self, spi: &mut SPI, frame: &Frame) -> Result<(), ErrorKind>
    where
        SPI: SpiBus<u8>,
    {
        self.cs.set_low().map_err(|_| ErrorKind::ChipSelectFault)?;

        let written = spi
            .write(frame.as_bytes())
            .and_then(|_| spi.flush())
            .map_err(|e| e.kind());

        let released = self.cs.set_high().map_err(|_| ErrorKind::ChipSelectFault);

        written.and(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{spi_pair, written_frames, SpiEvent};

    #[test]
    fn frame_is_bracketed_by_chip_select() {
        let (mut spi, cs, log) = spi_pair();
        let mut link = ServoLink::new(cs).unwrap();
        let frame = Frame::from_words(&[14_400, 57_600]);

        link.send(&mut spi, &frame).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                SpiEvent::Deselect,
                SpiEvent::Select,
                SpiEvent::Write(vec![0x38, 0x40, 0xE1, 0x00]),
                SpiEvent::Flush,
                SpiEvent::Deselect,
            ]
        );
    }

    #[test]
    fn write_error_still_releases_chip_select() {
        let (mut spi, cs, log) = spi_pair();
        let mut link = ServoLink::new(cs).unwrap();
        spi.fail_next_write(ErrorKind::Overrun);

        let err = link.send(&mut spi, &Frame::from_words(&[1])).unwrap_err();

        assert_eq!(err, ErrorKind::Overrun);
        assert!(written_frames(&log).is_empty());
        assert_eq!(log.borrow().last(), Some(&SpiEvent::Deselect));
    }

    #[test]
    fn chip_select_fault_sends_nothing() {
        let (mut spi, cs, log) = spi_pair();
        let mut link = ServoLink::new(cs).unwrap();
        let mut cs = link.free();
        cs.fail_edges(true);
        let mut link = ServoLink { cs };

        let err = link.send(&mut spi, &Frame::from_words(&[7])).unwrap_err();

        assert_eq!(err, ErrorKind::ChipSelectFault);
        assert!(written_frames(&log).is_empty());
    }
}
