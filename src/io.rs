use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use crate::app::{Completion, ReportEvent, Reporter};
use crate::config::SimConfig;
use crate::error::Result;
use crate::simulation::{ParticleStore, RunRequest, SimulationRun, TickSnapshot};

fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

fn maybe_decompress_gzip(data: &[u8]) -> std::io::Result<Option<Vec<u8>>> {
    if data.len() < 2 || data[0] != 0x1f || data[1] != 0x8b {
        return Ok(None);
    }

    let mut decoder = GzDecoder::new(Cursor::new(data));
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    Ok(Some(decoded))
}

fn read_maybe_gzip(path: &Path) -> std::io::Result<Vec<u8>> {
    let data = std::fs::read(path)?;
    Ok(maybe_decompress_gzip(&data)?.unwrap_or(data))
}

// ====================
// Saved runs
// ====================

/// Persisted state of an in-progress run. The RNG stream is not saved;
/// loading reseeds it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedRun {
    pub store: ParticleStore,
    pub initial: RunRequest,
    pub total_reacted: usize,
    pub tick: u64,
    pub config: SimConfig,
    pub seed: u64,
}

impl SavedRun {
    pub fn from_run(run: &SimulationRun) -> Self {
        Self {
            store: run.store.clone(),
            initial: run.initial,
            total_reacted: run.total_reacted,
            tick: run.tick,
            config: run.config.clone(),
            seed: run.seed,
        }
    }

    /// Rebuild the run. `seed` overrides the saved seed for the resumed stream.
    pub fn into_run(self, seed: Option<u64>) -> Result<SimulationRun> {
        SimulationRun::restore(
            self.store,
            self.initial,
            self.total_reacted,
            self.tick,
            self.config,
            seed.unwrap_or(self.seed),
        )
    }
}

/// Save as JSON, gzip-compressed when the path ends in `.gz`. Writes to a
/// temporary file first so an interrupted save never truncates the target.
pub fn save_run<P: AsRef<Path>>(path: P, run: &SimulationRun) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let state = SavedRun::from_run(run);
    let tmp_path = path.with_extension({
        let mut os = path.extension().map(|e| e.to_os_string()).unwrap_or_default();
        os.push(".tmp");
        os
    });
    {
        let file = File::create(&tmp_path)?;
        let writer = BufWriter::new(file);
        if is_gzip_path(path) {
            let mut encoder = GzEncoder::new(writer, Compression::fast());
            serde_json::to_writer(&mut encoder, &state)?;
            let mut writer = encoder.finish()?;
            writer.flush()?;
        } else {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, &state)?;
            writer.flush()?;
        }
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load a saved run; gzip is detected from the file contents.
pub fn load_run<P: AsRef<Path>>(path: P) -> Result<SavedRun> {
    let bytes = read_maybe_gzip(path.as_ref())?;
    Ok(serde_json::from_slice(&bytes)?)
}

// ====================
// Frame export
// ====================

enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Sink {
    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Sink::Plain(w) => w,
            Sink::Gzip(w) => w,
        }
    }

    fn close(self) -> std::io::Result<()> {
        match self {
            Sink::Plain(mut w) => w.flush(),
            Sink::Gzip(w) => w.finish()?.flush(),
        }
    }
}

/// Writes one JSON event per line: every snapshot, then the completion.
/// The file is closed when the completion arrives.
pub struct JsonlExporter {
    path: PathBuf,
    sink: Option<Sink>,
    lines: usize,
    error: Option<std::io::Error>,
}

impl JsonlExporter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = BufWriter::new(File::create(&path)?);
        let sink = if is_gzip_path(&path) {
            Sink::Gzip(GzEncoder::new(writer, Compression::default()))
        } else {
            Sink::Plain(writer)
        };
        Ok(Self {
            path,
            sink: Some(sink),
            lines: 0,
            error: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    fn write_event(&mut self, event: &ReportEvent) {
        if self.error.is_some() {
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        let result = serde_json::to_writer(sink.writer(), event)
            .map_err(std::io::Error::from)
            .and_then(|_| sink.writer().write_all(b"\n"));
        match result {
            Ok(()) => self.lines += 1,
            Err(e) => {
                warn!("frame export to {} failed: {}", self.path.display(), e);
                self.error = Some(e);
            }
        }
    }

    fn close(&mut self) {
        if let Some(sink) = self.sink.take() {
            if let Err(e) = sink.close() {
                warn!("closing {} failed: {}", self.path.display(), e);
                self.error.get_or_insert(e);
            }
        }
    }

    /// Close the file (if the run never completed) and report any write error.
    pub fn finish(mut self) -> Result<usize> {
        self.close();
        match self.error.take() {
            Some(e) => Err(e.into()),
            None => Ok(self.lines),
        }
    }
}

impl Reporter for JsonlExporter {
    fn on_snapshot(&mut self, snapshot: &TickSnapshot) {
        self.write_event(&ReportEvent::Snapshot(Box::new(snapshot.clone())));
    }

    fn on_complete(&mut self, completion: &Completion) {
        self.write_event(&ReportEvent::Complete(completion.clone()));
        self.close();
    }
}

impl Drop for JsonlExporter {
    fn drop(&mut self) {
        self.close();
    }
}

/// Read back an exported frame log (plain or gzip).
pub fn read_events<P: AsRef<Path>>(path: P) -> Result<Vec<ReportEvent>> {
    let bytes = read_maybe_gzip(path.as_ref())?;
    let mut events = Vec::new();
    for line in BufReader::new(Cursor::new(bytes)).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        events.push(serde_json::from_str(&line)?);
    }
    Ok(events)
}
