use crate::stream::StreamEvent;
use crate::surface::RenderSurface;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use zakai_core::ZakaiResult;

/// A piece of a reply, rendered differently depending on its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain prose or markdown.
    Text(String),
    /// The inner expression of a `$$...$$` or `\[...\]` block.
    Math(String),
}

#[allow(clippy::unwrap_used)]
fn math_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\$\$(.*?)\$\$|\\\[(.*?)\\\]").unwrap())
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(Segment::Text(last)) => last.push_str(text),
        _ => segments.push(Segment::Text(text.to_string())),
    }
}

fn math_inner<'t>(caps: &regex::Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str())
}

/// Splits a reply into text and block-math segments.
///
/// Math blocks may span lines. Empty segments are omitted and adjacent
/// text is merged, so the result is the same however the text was built.
pub fn split_math(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in math_block().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut segments, &text[last..whole.start()]);
        let inner = math_inner(&caps);
        if !inner.is_empty() {
            segments.push(Segment::Math(inner.to_string()));
        }
        last = whole.end();
    }
    push_text(&mut segments, &text[last..]);
    segments
}

/// Merges adjacent text segments.
pub fn coalesce(segments: impl IntoIterator<Item = Segment>) -> Vec<Segment> {
    let mut merged = Vec::new();
    for segment in segments {
        match segment {
            Segment::Text(t) => push_text(&mut merged, &t),
            math => merged.push(math),
        }
    }
    merged
}

/// Accumulates streamed fragments and hands out render deltas.
///
/// `push` returns only segments that can no longer change. A trailing `$`
/// or `\` that may start a delimiter is held back, as is a math block whose
/// closing delimiter has not arrived. `finish` flushes the rest. The
/// coalesced deltas always equal [`split_math`] of the full text.
#[derive(Debug, Default)]
pub struct ReplyBuffer {
    text: String,
    emitted: usize,
}

impl ReplyBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: &str) -> Vec<Segment> {
        self.text.push_str(fragment);
        let mut deltas = Vec::new();

        loop {
            let tail = &self.text[self.emitted..];
            let opener = [tail.find("$$"), tail.find("\\[")]
                .into_iter()
                .flatten()
                .min();

            let Some(start) = opener else {
                let held = usize::from(tail.ends_with('$') || tail.ends_with('\\'));
                let stable = tail.len() - held;
                push_text(&mut deltas, &tail[..stable]);
                self.emitted += stable;
                break;
            };

            push_text(&mut deltas, &tail[..start]);
            let block = &tail[start..];
            match math_block().captures(block) {
                Some(caps) if caps.get(0).is_some_and(|m| m.start() == 0) => {
                    let end = caps.get(0).map_or(0, |m| m.end());
                    let inner = math_inner(&caps);
                    if !inner.is_empty() {
                        deltas.push(Segment::Math(inner.to_string()));
                    }
                    self.emitted += start + end;
                }
                _ => {
                    // Unclosed block: wait for more text.
                    self.emitted += start;
                    break;
                }
            }
        }
        deltas
    }

    /// Flushes everything still held back.
    pub fn finish(&mut self) -> Vec<Segment> {
        let rest = split_math(&self.text[self.emitted..]);
        self.emitted = self.text.len();
        rest
    }

    /// Everything pushed so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// What came out of one streamed completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamedReply {
    /// Concatenation of every received fragment.
    pub text: String,
    /// Why the transfer stopped early, if it did.
    pub error: Option<String>,
}

impl StreamedReply {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            error: Some(reason.into()),
        }
    }

    /// The assistant message to record: the text, followed by an
    /// interruption marker when the transfer failed.
    pub fn transcript_text(&self) -> String {
        match &self.error {
            None => self.text.clone(),
            Some(reason) if self.text.is_empty() => format!("[Response interrupted: {reason}]"),
            Some(reason) => format!("{}\n\n[Response interrupted: {reason}]", self.text),
        }
    }
}

/// Feeds stream events to a surface with a cosmetic delay between fragments.
#[derive(Debug, Clone, Copy)]
pub struct ResponseStreamer {
    delay: Duration,
}

impl ResponseStreamer {
    pub fn new(typing_delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(typing_delay_ms),
        }
    }

    /// Consumes the stream until it ends, rendering deltas as they settle.
    ///
    /// Never fails: a transfer error ends consumption and is reported in
    /// [`StreamedReply::error`] alongside the text received before it.
    pub async fn consume(
        &self,
        mut events: mpsc::Receiver<StreamEvent>,
        handle: JoinHandle<ZakaiResult<String>>,
        surface: &mut dyn RenderSurface,
    ) -> StreamedReply {
        let mut buffer = ReplyBuffer::new();
        let mut error = None;
        let mut fragments = 0usize;

        surface.begin_reply();
        while let Some(event) = events.recv().await {
            match event {
                StreamEvent::TextDelta { text } => {
                    fragments += 1;
                    for segment in buffer.push(&text) {
                        surface.render_delta(&segment);
                    }
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                }
                StreamEvent::Done => break,
                StreamEvent::Error { message } => {
                    error = Some(message);
                    break;
                }
            }
        }
        for segment in buffer.finish() {
            surface.render_delta(&segment);
        }
        surface.end_reply();

        // Let the reader task finish even if it still has events queued.
        drop(events);
        match handle.await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                error.get_or_insert_with(|| e.to_string());
            }
            Err(e) => {
                error.get_or_insert_with(|| format!("stream task failed: {e}"));
            }
        }

        match &error {
            None => debug!(fragments, chars = buffer.text().len(), "Stream finished"),
            Some(reason) => warn!(fragments, reason = %reason, "Stream interrupted"),
        }
        StreamedReply {
            text: buffer.into_text(),
            error,
        }
    }
}
