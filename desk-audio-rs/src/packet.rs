use embedded_io::ErrorType;
use embedded_io_async::Read;

/// An endpoint that delivers data in whole packets, e.g. the OUT endpoint
/// of a USB CDC-ACM class.
#[allow(async_fn_in_trait)]
pub trait PacketSource {
    type Error: embedded_io::Error;

    /// Wait for the next packet and copy it into `buf`.
    ///
    /// `buf` is at least as large as the endpoint's maximum packet size.
    async fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Byte-stream view of a [`PacketSource`].
///
/// Holds one packet of up to `N` bytes and hands it out across as many
/// reads as the caller needs. A frame may span two packets.
pub struct PacketReader<P, const N: usize> {
    packets: P,
    packet: [u8; N],
    start: usize,
    end: usize,
}

impl<P: PacketSource, const N: usize> PacketReader<P, N> {
    pub fn new(packets: P) -> Self {
        Self {
            packets,
            packet: [0; N],
            start: 0,
            end: 0,
        }
    }

    /// Bytes received but not yet read.
    pub fn buffered(&self) -> usize {
        self.end - self.start
    }

    pub fn source_mut(&mut self) -> &mut P {
        &mut self.packets
    }
}

impl<P: PacketSource, const N: usize> ErrorType for PacketReader<P, N> {
    type Error = P::Error;
}

impl<P: PacketSource, const N: usize> Read for PacketReader<P, N> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, P::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        // Zero-length packets only mark the end of a transfer.
        while self.start == self.end {
            self.end = self.packets.read_packet(&mut self.packet).await?;
            self.start = 0;
        }

        let n = buf.len().min(self.end - self.start);
        buf[..n].copy_from_slice(&self.packet[self.start..self.start + n]);
        self.start += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_io::ErrorKind;

    /// Replays a fixed list of packets; `None` is a failed transfer.
    struct Script<'a> {
        packets: &'a [Option<&'a [u8]>],
    }

    impl PacketSource for Script<'_> {
        type Error = ErrorKind;

        async fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
            let packets = self.packets;
            let (first, rest) = packets.split_first().ok_or(ErrorKind::NotConnected)?;
            self.packets = rest;
            let packet = (*first).ok_or(ErrorKind::Other)?;
            buf[..packet.len()].copy_from_slice(packet);
            Ok(packet.len())
        }
    }

    #[test]
    fn packet_is_handed_out_across_reads() {
        let packets: [Option<&[u8]>; 1] = [Some(&[1, 2, 3, 4, 5, 6])];
        let mut reader: PacketReader<_, 64> = PacketReader::new(Script { packets: &packets });

        let mut buf = [0u8; 4];
        assert_eq!(block_on(reader.read(&mut buf)), Ok(4));
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(reader.buffered(), 2);
        assert_eq!(block_on(reader.read(&mut buf)), Ok(2));
        assert_eq!(&buf[..2], &[5, 6]);
    }

    #[test]
    fn zero_length_packets_are_skipped() {
        let packets: [Option<&[u8]>; 3] = [Some(&[]), Some(&[]), Some(&[7])];
        let mut reader: PacketReader<_, 64> = PacketReader::new(Script { packets: &packets });

        let mut buf = [0u8; 4];
        assert_eq!(block_on(reader.read(&mut buf)), Ok(1));
        assert_eq!(buf[0], 7);
    }

    #[test]
    fn transfer_error_is_passed_through() {
        let packets: [Option<&[u8]>; 2] = [None, Some(&[9])];
        let mut reader: PacketReader<_, 64> = PacketReader::new(Script { packets: &packets });

        let mut buf = [0u8; 4];
        assert_eq!(block_on(reader.read(&mut buf)), Err(ErrorKind::Other));
        assert_eq!(block_on(reader.read(&mut buf)), Ok(1));
        assert_eq!(buf[0], 9);
    }
}
