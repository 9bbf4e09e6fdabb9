use super::csv::command_reader::CommandReader;
use super::csv::record_writer::RecordWriter;
use super::csv::records::OutcomeRecord;
use crate::commands::executor::CommandExecutor;
use crate::commands::{CommandKind, Request};
use crate::error::Result;
use std::io::{Read, Write};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// Feeds a command file through the executor.
///
/// Consecutive transfer rows, or consecutive balance rows, run concurrently
/// as one batch. A row of a different kind waits until the previous batch
/// has finished. Create rows run one at a time so uids follow row order,
/// which lets later rows refer to the accounts by number. Outcomes are
/// written in input order.
pub struct BatchRunner {
    executor: CommandExecutor,
}

impl BatchRunner {
    pub fn new(executor: CommandExecutor) -> Self {
        Self { executor }
    }

    pub async fn run<R: Read, W: Write>(
        &self,
        reader: CommandReader<R>,
        writer: &mut RecordWriter<W>,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut batch: Vec<(u64, Request)> = Vec::new();

        for (index, record) in reader.records().enumerate() {
            let seq = index as u64 + 1;
            let request = match record {
                Ok(record) => Request::from(record),
                Err(e) => {
                    eprintln!("Error reading command: {}", e);
                    summary.skipped += 1;
                    continue;
                }
            };
            if batch.last().is_some_and(|(_, last)| {
                last.kind() != request.kind() || request.kind() == CommandKind::Create
            }) {
                summary.processed += self.flush(&mut batch, writer).await?;
            }
            batch.push((seq, request));
        }
        summary.processed += self.flush(&mut batch, writer).await?;

        Ok(summary)
    }

    async fn flush<W: Write>(
        &self,
        batch: &mut Vec<(u64, Request)>,
        writer: &mut RecordWriter<W>,
    ) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }
        let (seqs, requests): (Vec<u64>, Vec<Request>) = batch.drain(..).unzip();
        let kinds: Vec<CommandKind> = requests.iter().map(Request::kind).collect();
        debug!(size = requests.len(), kind = %kinds[0], "running batch");

        let results = self.executor.execute_all(requests).await;
        for ((seq, kind), result) in seqs.into_iter().zip(kinds).zip(&results) {
            writer.write(&OutcomeRecord::new(seq, kind, result))?;
        }
        Ok(results.len())
    }
}
