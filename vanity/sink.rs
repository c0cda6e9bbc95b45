use std::{
    fmt,
    io::Write,
    str::FromStr,
    sync::Mutex,
};

use serde::Deserialize;

use crate::{error::SearchError, result::SearchResult};

/// Receives matches as soon as they are found. Called concurrently from
/// every worker.
pub trait MatchSink: Sync {
    fn accept(&self, result: SearchResult) -> Result<(), SearchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Writes one line per match and flushes it, so an interrupted search
/// keeps everything found so far.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
    format: OutputFormat,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> MatchSink for WriterSink<W> {
    fn accept(&self, result: SearchResult) -> Result<(), SearchError> {
        let line = match self.format {
            OutputFormat::Text => result.to_string(),
            OutputFormat::Json => serde_json::to_string(&result)?,
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SearchError::Output("writer lock poisoned".into()))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps matches in memory, in the order workers reported them.
#[derive(Default)]
pub struct CollectSink {
    results: Mutex<Vec<SearchResult>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_results(self) -> Vec<SearchResult> {
        match self.results.into_inner() {
            Ok(results) => results,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl MatchSink for CollectSink {
    fn accept(&self, result: SearchResult) -> Result<(), SearchError> {
        self.results
            .lock()
            .map_err(|_| SearchError::Output("result lock poisoned".into()))?
            .push(result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytom::BytomDerivationPath;

    fn result(account: u32, address_index: u32) -> SearchResult {
        SearchResult {
            address: "bn1qczyc9gn76wlxkevse8ehj32l8hzp5wjrx9yah8".into(),
            account,
            address_index,
            path: BytomDerivationPath::bip44(account as u64, address_index as u64).unwrap(),
        }
    }

    #[test]
    fn text_sink_writes_one_line_per_match() {
        let sink = WriterSink::new(Vec::new(), OutputFormat::Text);
        sink.accept(result(1, 1)).unwrap();
        sink.accept(result(2, 0)).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "bn1qczyc9gn76wlxkevse8ehj32l8hzp5wjrx9yah8: accountIdx 1, addressIdx: 1, \
             path: [2c000000 99000000 01000000 00000000 01000000]"
        );
    }

    #[test]
    fn json_sink_writes_json_lines() {
        let sink = WriterSink::new(Vec::new(), OutputFormat::Json);
        sink.accept(result(3, 7)).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(value["account_index"], 3);
        assert_eq!(value["path"][4], "07000000");
    }

    #[test]
    fn collect_sink_keeps_order() {
        let sink = CollectSink::new();
        sink.accept(result(0, 5)).unwrap();
        sink.accept(result(0, 2)).unwrap();
        let indices: Vec<_> = sink.into_results().iter().map(|r| r.address_index).collect();
        assert_eq!(indices, vec![5, 2]);
    }

    #[test]
    fn output_format_parses() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::default().to_string(), "text");
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
