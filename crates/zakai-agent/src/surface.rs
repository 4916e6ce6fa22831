use crate::streamer::Segment;
use zakai_core::{Role, ZakaiResult};

/// Where the session controller draws its output.
///
/// The terminal front-end implements this; tests use a recording surface.
/// Only `offer_download` can fail, since it may touch the filesystem.
pub trait RenderSurface: Send {
    /// A finished message, as it was appended to the transcript.
    fn show_message(&mut self, role: Role, text: &str);

    /// An uploaded image, displayed inline.
    fn show_image(&mut self, file_name: &str, bytes: &[u8]);

    /// A generated image, by URL.
    fn show_image_url(&mut self, url: &str);

    /// Opens an assistant reply that will arrive as deltas.
    fn begin_reply(&mut self);

    /// Appends one settled piece of the reply being streamed.
    fn render_delta(&mut self, segment: &Segment);

    fn end_reply(&mut self);

    /// Hands a produced file to the user.
    fn offer_download(&mut self, file_name: &str, bytes: &[u8]) -> ZakaiResult<()>;

    /// A neutral status notice.
    fn info(&mut self, text: &str);

    fn warn(&mut self, text: &str);

    fn error(&mut self, text: &str);
}
