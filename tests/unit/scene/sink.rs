use super::*;

fn frame(px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: px.to_vec(),
        premultiplied: true,
    }
}

#[test]
fn in_memory_sink_keeps_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 1,
        height: 1,
        fps: Fps::default(),
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &frame([0, 0, 0, 255])).unwrap();
    sink.push_frame(FrameIndex(1), &frame([255, 0, 0, 255])).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].1.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(sink.config().unwrap().width, 1);
}

#[test]
fn straight_alpha_undoes_premultiplication() {
    let f = frame([64, 0, 0, 128]);
    assert_eq!(f.to_straight_alpha(), vec![128, 0, 0, 128]);
    assert_eq!(f.pixel(1, 0), None);
}

#[test]
fn png_sequence_writes_numbered_files_and_rejects_reordering() {
    let dir = std::path::PathBuf::from("target").join("png_sequence_sink");
    let _ = std::fs::remove_dir_all(&dir);
    let mut sink = PngSequenceSink::new(&dir, "f");
    sink.begin(SinkConfig {
        width: 1,
        height: 1,
        fps: Fps::default(),
    })
    .unwrap();
    sink.push_frame(FrameIndex(3), &frame([0, 0, 0, 255])).unwrap();
    assert!(sink.frame_path(FrameIndex(3)).exists());
    assert!(sink.push_frame(FrameIndex(3), &frame([0, 0, 0, 255])).is_err());
    assert_eq!(sink.written(), 1);
}
