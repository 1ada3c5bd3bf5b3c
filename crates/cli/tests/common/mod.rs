//! Common test utilities for end-to-end flow testing with stub tools.
//!
//! Each fixture builds an isolated project tree in a temp directory with
//! stand-in executables for the external tools (postprocess, pipeline,
//! checker script, rsync). The stubs record their argument lists under a
//! marker directory so tests can assert exactly what the orchestrator
//! invoked, without any real tool installed.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;

/// Records its arguments; creates `<stem>_0.pkl` in the output dir like
/// the real postprocessing tool would.
const POSTPROCESS_STUB: &str = r#"#!/bin/sh
[ "$1" = "--help" ] && exit 0
echo "$@" >> "$MARKER_DIR/postprocess.args"
input=""
outpath=""
while [ $# -gt 0 ]; do
  case "$1" in
    --input) input="$2"; shift 2 ;;
    --outpath) outpath="$2"; shift 2 ;;
    *) shift ;;
  esac
done
stem=$(basename "$input" .root)
mkdir -p "$outpath"
: > "$outpath/${stem}_0.pkl"
"#;

/// Records its arguments and the device visibility it ran with; on
/// `train` creates an experiment dir the way the real pipeline would.
const PIPELINE_STUB: &str = r#"#!/bin/sh
echo "$@" >> "$MARKER_DIR/pipeline.args"
echo "${CUDA_VISIBLE_DEVICES-unset}" >> "$MARKER_DIR/cuda.env"
sub="$1"
shift
prefix=""
while [ $# -gt 0 ]; do
  case "$1" in
    -p) prefix="$2"; shift 2 ;;
    *) shift ;;
  esac
done
if [ "$sub" = "train" ]; then
  mkdir -p "experiments/${prefix}run1/model_frozen"
  : > "experiments/${prefix}run1/model_frozen/frozen_graph.pb"
fi
"#;

/// Records the frozen-graph path and passes iff the file exists.
const CHECKER_STUB: &str = r#"#!/bin/sh
echo "$@" >> "$MARKER_DIR/checker.args"
test -f "$1"
"#;

/// Records its arguments and reports success without copying anything.
const RSYNC_STUB: &str = r#"#!/bin/sh
echo "$@" >> "$MARKER_DIR/rsync.args"
"#;

/// A postprocessing tool that always fails.
pub const FAILING_POSTPROCESS_STUB: &str = r#"#!/bin/sh
echo "conversion blew up" >&2
exit 1
"#;

/// An isolated project tree with stub external tools.
pub struct TestFixture {
    pub temp: TempDir,
    pub config_path: PathBuf,
    markers: PathBuf,
    bin: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let bin = temp.path().join("bin");
        let markers = temp.path().join("markers");
        std::fs::create_dir_all(&bin).expect("create bin dir");
        std::fs::create_dir_all(&markers).expect("create marker dir");

        write_executable(&bin.join("mlpf-postprocess"), POSTPROCESS_STUB);
        write_executable(&bin.join("mlpf-pipeline"), PIPELINE_STUB);
        write_executable(&bin.join("check-model"), CHECKER_STUB);
        write_executable(&bin.join("rsync"), RSYNC_STUB);

        let fixture = Self {
            config_path: temp.path().join("pfpipe.toml"),
            markers,
            bin,
            temp,
        };
        fixture.write_config();
        fixture
    }

    /// Overwrites one of the stub tools, e.g. with a failing variant.
    pub fn replace_tool(&self, name: &str, body: &str) {
        write_executable(&self.bin.join(name), body);
    }

    /// Places the three sample ntuples in the download directory, so
    /// every fetch is a skip and nothing touches the network.
    pub fn place_downloads(&self) {
        let download_dir = self
            .temp
            .path()
            .join("data/TTbar_14TeV_TuneCUETP8M1_cfi/root");
        std::fs::create_dir_all(&download_dir).expect("create download dir");
        for i in 1..=3 {
            std::fs::write(download_dir.join(format!("pfntuple_{}.root", i)), b"ntuple")
                .expect("place ntuple");
        }
    }

    /// Runs the orchestrator binary with the given arguments inside the
    /// fixture tree and waits for it to exit.
    pub async fn run(&self, args: &[&str]) -> Output {
        tokio::process::Command::new(env!("CARGO_BIN_EXE_pfpipe"))
            .args(args)
            .current_dir(self.temp.path())
            .env("PFPIPE_CONFIG", &self.config_path)
            .env("MARKER_DIR", &self.markers)
            .env("RUST_LOG", "error")
            .output()
            .await
            .expect("spawn pfpipe")
    }

    /// Lines a stub recorded, or empty if it never ran.
    pub fn recorded(&self, marker: &str) -> Vec<String> {
        std::fs::read_to_string(self.markers.join(marker))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn data_path(&self, rel: &str) -> PathBuf {
        self.temp
            .path()
            .join("data/TTbar_14TeV_TuneCUETP8M1_cfi")
            .join(rel)
    }

    fn write_config(&self) {
        let config = format!(
            r#"
[postprocess]
tool_path = "{bin}/mlpf-postprocess"

[pipeline]
tool_path = "{bin}/mlpf-pipeline"

[checker]
script_path = "{bin}/check-model"

[batch]
modules = []
gpus = [0, 1]
scratch_dir = "{root}/scratch"
project_dir = "{root}/project"
rsync_path = "{bin}/rsync"
"#,
            bin = self.bin.display(),
            root = self.temp.path().display(),
        );
        std::fs::write(&self.config_path, config).expect("write config");
    }
}

fn write_executable(path: &Path, body: &str) {
    std::fs::write(path, body).expect("write stub");
    let mut perms = std::fs::metadata(path).expect("stat stub").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).expect("chmod stub");
}
