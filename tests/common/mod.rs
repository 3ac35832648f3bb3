use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in stylesheet; the tool only resolves it and hands it to the engine.
const FIXTURE_STYLESHEET: &str = r#"<?xml version="1.0"?>
<xsl:stylesheet version="2.0" xmlns:xsl="http://www.w3.org/1999/XSL/Transform"/>
"#;

/// Fake Saxon-style engine: emits one Activity whose Id is the source file's
/// content. `MALFORMED` sources fail, `NOACTIVITIES`/`NOACTIVITY` sources
/// produce shape-broken results.
const FAKE_ENGINE: &str = r##"#!/bin/sh
src=""; xsl=""; out=""
for a in "$@"; do
  case "$a" in
    -s:*) src="${a#-s:}" ;;
    -xsl:*) xsl="${a#-xsl:}" ;;
    -o:*) out="${a#-o:}" ;;
  esac
done
if [ ! -f "$xsl" ]; then
  echo "stylesheet not found: $xsl" >&2
  exit 3
fi
id=$(cat "$src")
case "$id" in
  *MALFORMED*)
    echo "cannot compile input: $src" >&2
    exit 1
    ;;
  *NOACTIVITIES*)
    cat > "$out" <<EOF
<?xml version="1.0" encoding="UTF-8"?>
<TrainingCenterDatabase xmlns="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2">
  <Author>fake-engine</Author>
</TrainingCenterDatabase>
EOF
    ;;
  *NOACTIVITY*)
    cat > "$out" <<EOF
<?xml version="1.0" encoding="UTF-8"?>
<TrainingCenterDatabase xmlns="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2">
  <Activities>
  </Activities>
</TrainingCenterDatabase>
EOF
    ;;
  *)
    cat > "$out" <<EOF
<?xml version="1.0" encoding="UTF-8"?>
<TrainingCenterDatabase xmlns="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2"
                        xmlns:ns3="http://www.garmin.com/xmlschemas/ActivityExtension/v2">
  <Activities>
    <Activity Sport="Running">
      <Id>$id</Id>
    </Activity>
  </Activities>
</TrainingCenterDatabase>
EOF
    ;;
esac
"##;

pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
    pub workouts: PathBuf,
    pub out: PathBuf,
    pub stylesheet: PathBuf,
    pub engine: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        let workouts = root.join("workouts");
        fs::create_dir(&workouts).expect("create workouts dir");

        let stylesheet = root.join("nike+totcx.xsl");
        fs::write(&stylesheet, FIXTURE_STYLESHEET).expect("write stylesheet");
        let engine = write_fake_engine(&root);

        Self {
            _tmp: tmp,
            out: root.join("merged.tcx"),
            root,
            workouts,
            stylesheet,
            engine,
        }
    }

    pub fn add_workout(&self, name: &str, id: &str) {
        fs::write(self.workouts.join(name), id).expect("write workout");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("nike2tcx");
        cmd.current_dir(&self.root);
        cmd
    }

    pub fn convert(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--dir")
            .arg(&self.workouts)
            .arg("--out")
            .arg(&self.out)
            .arg("--stylesheet")
            .arg(&self.stylesheet)
            .arg("--engine")
            .arg(&self.engine);
        cmd
    }

    pub fn run_json(&self, extra: &[&str]) -> Value {
        let out = self
            .convert()
            .arg("--json")
            .args(extra)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn output_xml(&self) -> String {
        fs::read_to_string(&self.out).expect("read merged output")
    }
}

fn write_fake_engine(root: &Path) -> PathBuf {
    let path = root.join("fake-saxon");
    fs::write(&path, FAKE_ENGINE).expect("write fake engine");
    let mut perms = fs::metadata(&path).expect("engine metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("make engine executable");
    path
}
