use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use zakai_agent::{RenderSurface, Segment};
use zakai_core::{Role, ZakaiError, ZakaiResult};

/// Renders the chat on a terminal.
///
/// Conversation goes to `out`, warnings and errors to `err`. Downloads are
/// written into `output_dir`.
pub struct TerminalSurface<O, E> {
    out: O,
    err: E,
    output_dir: PathBuf,
}

impl TerminalSurface<io::Stdout, io::Stderr> {
    pub fn stdio(output_dir: impl Into<PathBuf>) -> Self {
        Self::new(io::stdout(), io::stderr(), output_dir)
    }
}

impl<O: Write + Send, E: Write + Send> TerminalSurface<O, E> {
    pub fn new(out: O, err: E, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            out,
            err,
            output_dir: output_dir.into(),
        }
    }

    pub fn prompt(&mut self) {
        let _ = write!(self.out, "{} ", ">".bold());
        let _ = self.out.flush();
    }

    /// Prints a plain line, e.g. command output.
    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    #[cfg(test)]
    fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

fn speaker(role: Role) -> colored::ColoredString {
    match role {
        Role::User => "you ›".cyan().bold(),
        Role::Assistant => "zakai ›".green().bold(),
        Role::System => "system ›".dimmed(),
    }
}

impl<O: Write + Send, E: Write + Send> RenderSurface for TerminalSurface<O, E> {
    fn show_message(&mut self, role: Role, text: &str) {
        let _ = writeln!(self.out, "{} {text}\n", speaker(role));
    }

    fn show_image(&mut self, file_name: &str, bytes: &[u8]) {
        let _ = writeln!(
            self.out,
            "{} {file_name} ({} bytes)",
            "[image]".magenta(),
            bytes.len()
        );
    }

    fn show_image_url(&mut self, url: &str) {
        let _ = writeln!(self.out, "{} {}", "[image]".magenta(), url.underline());
    }

    fn begin_reply(&mut self) {
        let _ = write!(self.out, "{} ", speaker(Role::Assistant));
        let _ = self.out.flush();
    }

    fn render_delta(&mut self, segment: &Segment) {
        let _ = match segment {
            Segment::Text(text) => write!(self.out, "{text}"),
            Segment::Math(expr) => write!(self.out, "\n    {}\n", expr.trim().yellow()),
        };
        let _ = self.out.flush();
    }

    fn end_reply(&mut self) {
        let _ = writeln!(self.out, "\n");
    }

    fn offer_download(&mut self, file_name: &str, bytes: &[u8]) -> ZakaiResult<()> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| ZakaiError::Render(format!("invalid download name '{file_name}'")))?;
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(name);
        std::fs::write(&path, bytes)?;

        info!(path = %path.display(), bytes = bytes.len(), "Download written");
        let _ = writeln!(self.out, "{} {}", "saved".green().bold(), path.display());
        Ok(())
    }

    fn info(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text.dimmed());
    }

    fn warn(&mut self, text: &str) {
        let _ = writeln!(self.err, "{} {text}", "warning:".yellow().bold());
    }

    fn error(&mut self, text: &str) {
        let _ = writeln!(self.err, "{} {text}", "error:".red().bold());
    }
}
