use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use petri_core::material::MaterialProvider;
use petri_core::types::ChunkCoord;
use petri_persist::Decompressor;
use rayon::prelude::*;

use crate::chunk::Chunk;
use crate::error::WorldError;

/// A chunk file to load and the grid position it belongs at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkJob {
    pub position: ChunkCoord,
    pub path: PathBuf,
}

/// A chunk file that could not be read or decoded.
#[derive(Debug)]
pub struct LoadFailure {
    pub position: ChunkCoord,
    pub path: PathBuf,
    pub error: WorldError,
}

/// Decodes chunks off the consuming thread and hands them over a channel.
///
/// Decoding only reads the shared material provider, so any number of chunks
/// can be decoded at once. Finished chunks are drained on the thread that owns
/// the [`ChunkMap`](crate::chunk_map::ChunkMap).
pub struct ChunkLoader {
    provider: Arc<dyn MaterialProvider>,
    sender: Sender<Chunk>,
    receiver: Receiver<Chunk>,
}

impl ChunkLoader {
    pub fn new(provider: Arc<dyn MaterialProvider>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            provider,
            sender,
            receiver,
        }
    }

    pub fn provider(&self) -> &Arc<dyn MaterialProvider> {
        &self.provider
    }

    /// A sender for handing chunks decoded elsewhere to this loader.
    pub fn sender(&self) -> Sender<Chunk> {
        self.sender.clone()
    }

    /// Decode one chunk and queue it. Nothing is queued on failure.
    pub fn load_bytes(&self, position: ChunkCoord, bytes: &[u8]) -> Result<(), WorldError> {
        let chunk = Chunk::decode(position, bytes, self.provider.as_ref())?;
        // The receiver lives as long as self, so the send cannot fail.
        let _ = self.sender.send(chunk);
        Ok(())
    }

    /// Read and decode chunk files in parallel, queueing every success.
    ///
    /// A bad file never affects the others; its failure is logged and
    /// returned.
    pub fn load_files(
        &self,
        jobs: &[ChunkJob],
        decompressor: &dyn Decompressor,
    ) -> Vec<LoadFailure> {
        let provider = self.provider.as_ref();

        let failures: Vec<LoadFailure> = jobs
            .par_iter()
            .map_with(self.sender.clone(), |sender, job| {
                let result = decompressor
                    .read_chunk_file(&job.path)
                    .map_err(WorldError::from)
                    .and_then(|bytes| Chunk::decode(job.position, &bytes, provider));
                match result {
                    Ok(chunk) => {
                        let _ = sender.send(chunk);
                        None
                    }
                    Err(error) => {
                        log::warn!("skipping chunk {}: {error}", job.path.display());
                        Some(LoadFailure {
                            position: job.position,
                            path: job.path.clone(),
                            error,
                        })
                    }
                }
            })
            .flatten()
            .collect();

        log::info!(
            "loaded {} of {} chunk files",
            jobs.len() - failures.len(),
            jobs.len()
        );
        failures
    }

    /// Chunks finished since the last call, without blocking.
    pub fn finished(&self) -> impl Iterator<Item = Chunk> + '_ {
        self.receiver.try_iter()
    }
}
