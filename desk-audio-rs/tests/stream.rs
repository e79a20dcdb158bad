//! Lock-step behaviour of the audio streamer against mock I/O.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use desk_audio::{AudioError, AudioFrame, AudioStreamer, FrameReader, SampleSink};
use embassy_futures::block_on;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Read(usize),
    Write(i32, i32),
}

type Log = Rc<RefCell<Vec<Event>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Overrun;

impl embedded_io::Error for Overrun {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

/// Byte source; a `None` entry fails the read that reaches it.
struct Source {
    bytes: VecDeque<Option<u8>>,
    log: Log,
}

impl Source {
    fn new(log: &Log, bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.iter().copied().map(Some).collect(),
            log: log.clone(),
        }
    }

    fn push(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes.iter().copied().map(Some));
    }

    fn push_error(&mut self) {
        self.bytes.push_back(None);
    }
}

impl embedded_io::ErrorType for Source {
    type Error = Overrun;
}

impl embedded_io_async::Read for Source {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Overrun> {
        let mut n = 0;
        while n < buf.len() {
            match self.bytes.front() {
                Some(Some(b)) => {
                    buf[n] = *b;
                    self.bytes.pop_front();
                    n += 1;
                }
                Some(None) if n == 0 => {
                    self.bytes.pop_front();
                    return Err(Overrun);
                }
                _ => break,
            }
        }
        self.log.borrow_mut().push(Event::Read(n));
        Ok(n)
    }
}

struct Sink {
    log: Log,
}

impl SampleSink for Sink {
    type Error = ();

    async fn write_stereo(&mut self, left: i32, right: i32) -> Result<(), ()> {
        self.log.borrow_mut().push(Event::Write(left, right));
        Ok(())
    }
}

fn writes(log: &Log) -> Vec<(i32, i32)> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Write(l, r) => Some((*l, *r)),
            _ => None,
        })
        .collect()
}

#[test]
fn first_frame_is_read_before_output_starts() {
    let log = Log::default();
    let mut reader = FrameReader::new(Source::new(&log, &[0x00, 0x00, 0x00, 0x7f]));

    let first = block_on(reader.read_frame()).unwrap();
    assert_eq!(first, AudioFrame(127));
    assert!(writes(&log).is_empty());
}

#[test]
fn frame_is_written_before_next_read() {
    let log = Log::default();
    let mut source = Source::new(&log, &[0x00, 0x00, 0x00, 0x7f]);
    source.push(&[0xff, 0xff, 0xff, 0xfe]);
    let mut reader = FrameReader::new(source);
    let first = block_on(reader.read_frame()).unwrap();
    log.borrow_mut().clear();

    let mut streamer = AudioStreamer::new(reader, Sink { log: log.clone() }, first);
    block_on(streamer.step()).unwrap();

    let events = log.borrow().clone();
    assert_eq!(events.first(), Some(&Event::Write(127, 127)));
    assert!(matches!(events.get(1), Some(Event::Read(_))));
    assert_eq!(streamer.frame(), AudioFrame(-2));
    assert_eq!(streamer.frames(), 1);
}

#[test]
fn frames_are_relayed_in_order() {
    let log = Log::default();
    let mut source = Source::new(&log, &[]);
    for sample in [1i32, -1, 1000, i32::MAX] {
        source.push(&sample.to_be_bytes());
    }

    let mut streamer = AudioStreamer::new(
        FrameReader::new(source),
        Sink { log: log.clone() },
        AudioFrame::SILENCE,
    );
    for _ in 0..4 {
        block_on(streamer.step()).unwrap();
    }

    assert_eq!(
        writes(&log),
        [(0, 0), (1, 1), (-1, -1), (1000, 1000)]
    );
    assert_eq!(streamer.frame(), AudioFrame(i32::MAX));
}

#[test]
fn read_error_replays_last_frame() {
    let log = Log::default();
    let mut source = Source::new(&log, &[]);
    source.push(&5i32.to_be_bytes());
    source.push_error();
    source.push(&6i32.to_be_bytes());

    let mut streamer =
        AudioStreamer::new(FrameReader::new(source), Sink { log: log.clone() }, AudioFrame(4));
    block_on(streamer.step()).unwrap();
    assert!(matches!(
        block_on(streamer.step()),
        Err(AudioError::Source(Overrun))
    ));
    assert_eq!(streamer.source_errors(), 1);
    assert_eq!(streamer.frame(), AudioFrame(5));
    block_on(streamer.step()).unwrap();
    block_on(streamer.step()).ok();

    assert_eq!(writes(&log), [(4, 4), (5, 5), (5, 5), (6, 6)]);
}

#[test]
fn sink_error_skips_the_read() {
    struct Broken;

    impl SampleSink for Broken {
        type Error = &'static str;

        async fn write_stereo(&mut self, _: i32, _: i32) -> Result<(), &'static str> {
            Err("dma")
        }
    }

    let log = Log::default();
    let source = Source::new(&log, &9i32.to_be_bytes());
    let mut streamer = AudioStreamer::new(FrameReader::new(source), Broken, AudioFrame(1));

    assert!(matches!(
        block_on(streamer.step()),
        Err(AudioError::Sink("dma"))
    ));
    assert!(log.borrow().is_empty());
    assert_eq!(streamer.frame(), AudioFrame(1));
}

#[test]
fn error_inside_a_frame_keeps_alignment() {
    let log = Log::default();
    let mut source = Source::new(&log, &[0x00, 0x00]);
    source.push_error();
    source.push(&[0x00, 0x07]);
    for sample in [1i32, 2, 3] {
        source.push(&sample.to_be_bytes());
    }

    let mut streamer =
        AudioStreamer::new(FrameReader::new(source), Sink { log: log.clone() }, AudioFrame(9));
    assert!(matches!(
        block_on(streamer.step()),
        Err(AudioError::Source(Overrun))
    ));
    assert_eq!(streamer.split_frames(), 1);
    assert_eq!(streamer.frame(), AudioFrame(9));

    for _ in 0..4 {
        block_on(streamer.step()).unwrap();
    }
    assert_eq!(writes(&log), [(9, 9), (9, 9), (7, 7), (1, 1), (2, 2)]);
    assert_eq!(streamer.frame(), AudioFrame(3));
    assert_eq!(streamer.source_errors(), 1);
}

#[test]
fn error_between_frames_is_not_a_split() {
    let log = Log::default();
    let mut source = Source::new(&log, &[]);
    source.push_error();
    source.push(&5i32.to_be_bytes());

    let mut streamer =
        AudioStreamer::new(FrameReader::new(source), Sink { log: log.clone() }, AudioFrame(4));
    assert!(block_on(streamer.step()).is_err());
    assert_eq!(streamer.split_frames(), 0);
    block_on(streamer.step()).unwrap();
    assert_eq!(streamer.frame(), AudioFrame(5));
}
