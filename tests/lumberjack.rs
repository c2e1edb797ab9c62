use std::io::Write as _;
use std::path::Path;

use lumberjack::audio::AudioEngine;
use lumberjack::input::{EventSource, KeyAction, SessionEvent};
use lumberjack::lumberjack::run;
use lumberjack::opts::{Opts, default_log_path};
use lumberjack::output_type::OutputTarget;

/// Engine whose position advances one second per query, so each advance
/// keypress lands on a predictable offset.
#[derive(Default)]
struct TickEngine {
    millis: u64,
    playing: bool,
}

impl AudioEngine for TickEngine {
    fn play(&mut self, start_offset_seconds: f64) -> lumberjack::Result<()> {
        self.millis = (start_offset_seconds * 1000.0) as u64;
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn resume(&mut self) {
        self.playing = true;
    }

    fn position_millis(&self) -> u64 {
        self.millis
    }
}

/// A scripted key sequence, ending in quit once drained.
struct Keys(std::collections::VecDeque<KeyAction>);

impl Keys {
    fn advances(n: usize) -> Self {
        Self((0..n).map(|_| KeyAction::Advance).collect())
    }
}

impl EventSource for Keys {
    fn next_event(&mut self) -> lumberjack::Result<SessionEvent> {
        Ok(SessionEvent::Key(self.0.pop_front().unwrap_or(KeyAction::Quit)))
    }
}

/// TickEngine is paused-position only; give each keypress a distinct offset
/// by ticking from the event source instead.
struct TickingKeys {
    keys: Keys,
    millis: std::rc::Rc<std::cell::Cell<u64>>,
}

struct SharedEngine(std::rc::Rc<std::cell::Cell<u64>>);

impl AudioEngine for SharedEngine {
    fn play(&mut self, start_offset_seconds: f64) -> lumberjack::Result<()> {
        self.0.set((start_offset_seconds * 1000.0) as u64);
        Ok(())
    }

    fn pause(&mut self) {}
    fn resume(&mut self) {}

    fn position_millis(&self) -> u64 {
        self.0.get()
    }
}

impl EventSource for TickingKeys {
    fn next_event(&mut self) -> lumberjack::Result<SessionEvent> {
        self.millis.set(self.millis.get() + 1000);
        self.keys.next_event()
    }
}

fn write_epub(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    let entries: &[(&str, &str)] = &[
        (
            "META-INF/container.xml",
            r#"<container><rootfiles>
                 <rootfile full-path="OEBPS/content.opf"/>
               </rootfiles></container>"#,
        ),
        (
            "OEBPS/content.opf",
            r#"<package>
                 <manifest>
                   <item id="ch1" href="ch1.xhtml"/>
                   <item id="ch2" href="ch2.xhtml"/>
                 </manifest>
                 <spine>
                   <itemref idref="ch1"/>
                   <itemref idref="ch2"/>
                 </spine>
               </package>"#,
        ),
        (
            "OEBPS/ch1.xhtml",
            r#"<html><body>
                 <div class="identifiable" id="p1">Call me Ishmael.</div>
                 <div class="identifiable" id="p2">Some years ago</div>
               </body></html>"#,
        ),
        (
            "OEBPS/ch2.xhtml",
            r#"<html><body>
                 <div class="identifiable" id="p3">never mind how long precisely</div>
               </body></html>"#,
        ),
    ];
    for (name, content) in entries {
        zip.start_file(*name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}

#[test]
fn aligns_an_epub_into_smil_documents() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let epub = dir.path().join("book.epub");
    write_epub(&epub)?;
    let audio = dir.path().join("book.m4a");
    let smil_dir = dir.path().join("smil");

    let opts = Opts {
        input_path: epub,
        audio_path: audio.clone(),
        output: OutputTarget::SmilDirectory(smil_dir.clone()),
        log_path: default_log_path(&audio),
        use_existing_log: false,
        start_offset_seconds: 0.0,
    };

    let millis = std::rc::Rc::new(std::cell::Cell::new(0));
    let mut events = TickingKeys {
        keys: Keys::advances(3),
        millis: millis.clone(),
    };
    run(&opts, SharedEngine(millis), &mut events, std::io::sink())?;

    // The durable log has one line per advance.
    let log = std::fs::read_to_string(dir.path().join("book.m4a.txt"))?;
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "0\t1\tp1\tCall me Ishmael.\tch1.xhtml\t0");
    assert_eq!(lines[2], "2\t3\tp3\tnever mind how long precisely\tch2.xhtml\t1");

    // One SMIL document per content file, clips numbered per file.
    let ch1 = std::fs::read_to_string(smil_dir.join("ch1.xhtml.smil"))?;
    assert_eq!(ch1.matches("<par ").count(), 2);
    assert!(ch1.contains(r#"id="audio-ch1-0""#));
    assert!(ch1.contains(r#"id="audio-ch1-1""#));
    assert!(ch1.contains(r#"<text src="ch1.xhtml#p1"/>"#));
    assert!(ch1.contains(r#"clipBegin="0s" clipEnd="1s""#));

    let ch2 = std::fs::read_to_string(smil_dir.join("ch2.xhtml.smil"))?;
    assert_eq!(ch2.matches("<par ").count(), 1);
    assert!(ch2.contains(r#"id="audio-ch2-0""#));
    assert!(ch2.contains(r#"src="book.m4a""#));
    Ok(())
}

#[test]
fn converts_an_existing_log_into_a_timeline() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let log_path = dir.path().join("session.txt");
    std::fs::write(
        &log_path,
        "0\t5\tid1\thello\tch1.xhtml\t0\n\
         5\t5\tDANGER,\tWILL\tROBINSON,\tDANGER!\n\
         5\t9\tid2\tworld\tch1.xhtml\t0\n",
    )?;
    let timeline_path = dir.path().join("timeline.xml");

    let opts = Opts {
        input_path: dir.path().join("unused.epub"),
        audio_path: dir.path().join("book.m4a"),
        output: OutputTarget::TimelineFile(timeline_path.clone()),
        log_path,
        use_existing_log: true,
        start_offset_seconds: 0.0,
    };

    // No session runs, so the missing input file is never touched.
    let mut events = Keys::advances(0);
    run(&opts, TickEngine::default(), &mut events, std::io::sink())?;

    let timeline = std::fs::read_to_string(&timeline_path)?;
    assert_eq!(timeline.matches("<when ").count(), 2);
    assert!(timeline.contains(r##"<when xml:id="audio-0" corresp="#id1" from="0" to="5"/>"##));
    assert!(timeline.contains(r##"<when xml:id="audio-1" corresp="#id2" from="5" to="9"/>"##));
    assert!(!timeline.contains("DANGER"));
    Ok(())
}

#[test]
fn aligns_a_bare_xml_document_end_to_end() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let xml = dir.path().join("play.xml");
    std::fs::write(
        &xml,
        r#"<TEI>
             <div class="transcribable" id="sp1">first speech</div>
             <div class="transcribable" id="sp2">second speech</div>
           </TEI>"#,
    )?;
    let audio = dir.path().join("play.ogg");
    let timeline_path = dir.path().join("timeline.xml");

    let opts = Opts {
        input_path: xml,
        audio_path: audio.clone(),
        output: OutputTarget::TimelineFile(timeline_path.clone()),
        log_path: default_log_path(&audio),
        use_existing_log: false,
        start_offset_seconds: 0.0,
    };

    let millis = std::rc::Rc::new(std::cell::Cell::new(0));
    let mut events = TickingKeys {
        keys: Keys::advances(2),
        millis: millis.clone(),
    };
    run(&opts, SharedEngine(millis), &mut events, std::io::sink())?;

    let timeline = std::fs::read_to_string(&timeline_path)?;
    assert!(timeline.contains(r##"corresp="#sp1""##));
    assert!(timeline.contains(r##"corresp="#sp2""##));
    Ok(())
}

#[test]
fn session_exhaustion_still_produces_output() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let xml = dir.path().join("play.xml");
    std::fs::write(
        &xml,
        r#"<TEI><div class="transcribable" id="sp1">only speech</div></TEI>"#,
    )?;
    let audio = dir.path().join("play.ogg");
    let timeline_path = dir.path().join("timeline.xml");

    let opts = Opts {
        input_path: xml,
        audio_path: audio.clone(),
        output: OutputTarget::TimelineFile(timeline_path.clone()),
        log_path: default_log_path(&audio),
        use_existing_log: false,
        start_offset_seconds: 0.0,
    };

    // More advances than units: the session ends gracefully, the log keeps
    // its one valid record, and generation still runs.
    let millis = std::rc::Rc::new(std::cell::Cell::new(0));
    let mut events = TickingKeys {
        keys: Keys::advances(5),
        millis: millis.clone(),
    };
    run(&opts, SharedEngine(millis), &mut events, std::io::sink())?;

    let timeline = std::fs::read_to_string(&timeline_path)?;
    assert_eq!(timeline.matches("<when ").count(), 1);
    Ok(())
}
