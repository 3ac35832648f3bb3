//! The TCX output document and Activity extraction.
//!
//! The output document is a typed value: the fixed namespace set lives in a
//! constant table and serialization goes through the XML writer, so the
//! shell is never patched together from raw strings. Per-file transform
//! results are read with a namespace-resolving reader and the single
//! `Activity` element is moved out as an owned event sequence.

use std::io;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use quick_xml::writer::Writer;
use thiserror::Error;

/// Namespace of the TrainingCenterDatabase v2 schema.
pub const TCX_NS: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2";

/// Namespace declarations carried on the output root element.
const ROOT_NAMESPACES: &[(&str, &str)] = &[
    ("xmlns:xs", "http://www.w3.org/2001/XMLSchema"),
    ("xmlns:ns5", "http://www.garmin.com/xmlschemas/ActivityGoals/v1"),
    ("xmlns:ns3", "http://www.garmin.com/xmlschemas/ActivityExtension/v2"),
    ("xmlns:ns2", "http://www.garmin.com/xmlschemas/UserProfile/v2"),
    ("xmlns", TCX_NS),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("xmlns:ns4", "http://www.garmin.com/xmlschemas/ProfileExtension/v1"),
];

const ROOT_TAG: &str = "TrainingCenterDatabase";
const ACTIVITIES_TAG: &str = "Activities";

#[derive(Error, Debug)]
pub enum TcxError {
    #[error("reading {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
    #[error("no Activities element in transform result {}", .0.display())]
    MissingActivities(PathBuf),
    #[error("no Activity element in transform result {}", .0.display())]
    MissingActivity(PathBuf),
}

/// The owned event sequence of one extracted `<Activity>` element.
#[derive(Debug)]
pub struct ActivityFragment {
    events: Vec<Event<'static>>,
}

/// In-memory output document: the fixed shell plus accumulated activities.
#[derive(Default)]
pub struct TcxDocument {
    activities: Vec<ActivityFragment>,
}

impl TcxDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `activity` as the last child of the `Activities` container.
    pub fn push_activity(&mut self, activity: ActivityFragment) {
        self.activities.push(activity);
    }

    /// Serialize the whole document, XML declaration included.
    pub fn to_xml(&self) -> io::Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let root = BytesStart::new(ROOT_TAG).with_attributes(ROOT_NAMESPACES.iter().copied());
        writer.write_event(Event::Start(root))?;
        writer.write_event(Event::Start(BytesStart::new(ACTIVITIES_TAG)))?;
        for activity in &self.activities {
            for event in &activity.events {
                writer.write_event(event.clone())?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new(ACTIVITIES_TAG)))?;
        writer.write_event(Event::End(BytesEnd::new(ROOT_TAG)))?;

        let mut xml = writer.into_inner();
        xml.push(b'\n');
        Ok(xml)
    }

    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_xml()?)
    }
}

/// Pull the single `Activities/Activity` element out of a transform result.
///
/// Elements are matched by qualified name in the TCX namespace, whatever
/// prefix the result document uses. The captured events keep their original
/// prefixes; those resolve against the declarations on the output root,
/// which carries the same namespace set as every transform result.
pub fn extract_activity(path: &Path) -> Result<ActivityFragment, TcxError> {
    let mut reader = NsReader::from_file(path).map_err(|source| TcxError::Xml {
        path: path.to_path_buf(),
        source,
    })?;
    // inter-element whitespace is formatting only; dropping it here lets the
    // indenting writer lay out the merged document uniformly
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut events: Vec<Event<'static>> = Vec::new();
    let mut depth = 0usize;
    let mut capturing = false;
    let mut in_activities = false;
    let mut saw_activities = false;

    loop {
        buf.clear();
        let (ns, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|source| TcxError::Xml {
                path: path.to_path_buf(),
                source,
            })?;

        if capturing {
            match event {
                Event::Eof => break,
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                _ => {}
            }
            events.push(event.into_owned());
            if depth == 0 {
                return Ok(ActivityFragment { events });
            }
            continue;
        }

        match event {
            Event::Eof => break,
            Event::Start(e) if in_tcx(&ns) => match e.local_name().as_ref() {
                b"Activities" => {
                    saw_activities = true;
                    in_activities = true;
                }
                b"Activity" if in_activities => {
                    capturing = true;
                    depth = 1;
                    events.push(Event::Start(e.into_owned()));
                }
                _ => {}
            },
            Event::Empty(e) if in_tcx(&ns) => {
                if in_activities && e.local_name().as_ref() == b"Activity" {
                    events.push(Event::Empty(e.into_owned()));
                    return Ok(ActivityFragment { events });
                }
            }
            Event::End(e) if in_tcx(&ns) => {
                if e.local_name().as_ref() == b"Activities" {
                    in_activities = false;
                }
            }
            _ => {}
        }
    }

    if saw_activities {
        Err(TcxError::MissingActivity(path.to_path_buf()))
    } else {
        Err(TcxError::MissingActivities(path.to_path_buf()))
    }
}

fn in_tcx(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(n)) if *n == TCX_NS.as_bytes())
}
