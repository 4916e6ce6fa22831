use crate::config::ChatConfig;
use crate::context::ContextWindow;
use crate::imagegen::ImageGenerator;
use crate::intent::{Intent, IntentClassifier};
use crate::llm::{CompletionRequest, LlmClient};
use crate::reviser::DocumentReviser;
use crate::streamer::{ResponseStreamer, StreamedReply};
use crate::surface::RenderSurface;
use crate::vision::{is_error_reply, ImageAnalyzer};
use tracing::{error, info, warn};
use zakai_core::{Role, ZakaiError, ZakaiResult};
use zakai_ingest::{extract, image_mime, Extraction, FileKind};
use zakai_session::{Attachment, PendingImage, Session, SessionState};

/// Assistant message recorded after an image has been generated.
pub const IMAGE_ACKNOWLEDGEMENT: &str = "Gambar berhasil dibuat sesuai permintaan Anda.";
/// Warning shown when an upload yields no text.
pub const NO_TEXT_WARNING: &str = "The file could not be analyzed or contains no text.";

/// One thing the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// A file picked in the upload control.
    UploadFile { file_name: String, bytes: Vec<u8> },
    /// A line typed into the chat input.
    SubmitText(String),
}

/// Orchestrates one user action at a time against a [`Session`].
///
/// File uploads become user messages, images wait for their question, and
/// text is routed by [`IntentClassifier`] to revision, image generation or a
/// streamed chat completion.
pub struct SessionController {
    llm: LlmClient,
    classifier: IntentClassifier,
    context: ContextWindow,
    streamer: ResponseStreamer,
    analyzer: ImageAnalyzer,
    generator: ImageGenerator,
    reviser: DocumentReviser,
    max_tokens: u32,
}

impl SessionController {
    /// Talks to the provider named in `config.model`.
    pub fn new(config: &ChatConfig) -> Self {
        Self::with_client(LlmClient::new(config.model.clone()), config)
    }

    /// Uses `llm` for every remote call instead of the configured provider.
    pub fn with_client(llm: LlmClient, config: &ChatConfig) -> Self {
        Self {
            classifier: IntentClassifier::new(config.intents.clone()),
            context: ContextWindow::new(config.stream.max_context_messages),
            streamer: ResponseStreamer::new(config.stream.typing_delay_ms),
            analyzer: ImageAnalyzer::new(llm.clone(), config.model.vision_max_tokens),
            generator: ImageGenerator::new(llm.clone()),
            reviser: DocumentReviser::new(llm.clone(), config.model.revision_max_tokens),
            max_tokens: config.model.max_tokens,
            llm,
        }
    }

    /// Handles one user action and leaves the session at rest.
    ///
    /// Remote failures are shown on the surface and never returned; an error
    /// here means the session itself was misused.
    pub async fn handle(
        &self,
        session: &mut Session,
        action: UserAction,
        surface: &mut dyn RenderSurface,
    ) -> ZakaiResult<()> {
        if !session.state().accepts_input() {
            return Err(ZakaiError::Session(format!(
                "session is busy ({:?})",
                session.state()
            )));
        }
        if session.state() == SessionState::Idle {
            session.transition(SessionState::AwaitingUserInput)?;
        }

        let result = match action {
            UserAction::UploadFile { file_name, bytes } => {
                self.handle_upload(session, file_name, bytes, surface)
            }
            UserAction::SubmitText(text) if session.pending_image.is_some() => {
                self.answer_image_question(session, &text, surface).await
            }
            UserAction::SubmitText(text) => self.handle_text(session, text, surface).await,
        };

        session.settle();
        result
    }

    fn handle_upload(
        &self,
        session: &mut Session,
        file_name: String,
        bytes: Vec<u8>,
        surface: &mut dyn RenderSurface,
    ) -> ZakaiResult<()> {
        session.transition(SessionState::FileBranch)?;

        match FileKind::from_name(&file_name) {
            FileKind::Document(_) => self.ingest_document(session, file_name, bytes, surface),
            FileKind::Image => {
                surface.show_image(&file_name, &bytes);
                info!(session_id = %session.id, file = %file_name, "Image staged for a question");
                let mime = image_mime(&file_name);
                session.pending_image = Some(PendingImage {
                    file_name,
                    bytes,
                    mime,
                });
                session.transition(SessionState::AwaitingImagePrompt)?;
                surface.info("Image received. Ask a question about it.");
                Ok(())
            }
            FileKind::Other => {
                warn!(file = %file_name, "Unsupported upload");
                surface.warn(&format!("Unsupported file type: {file_name}"));
                Ok(())
            }
        }
    }

    fn ingest_document(
        &self,
        session: &mut Session,
        file_name: String,
        bytes: Vec<u8>,
        surface: &mut dyn RenderSurface,
    ) -> ZakaiResult<()> {
        let text = match extract(&file_name, &bytes) {
            Ok(Extraction::Text(text)) if !text.trim().is_empty() => text,
            Ok(Extraction::Diagnostic(diagnostic)) => {
                surface.warn(&diagnostic);
                return Ok(());
            }
            Ok(_) => {
                surface.warn(NO_TEXT_WARNING);
                return Ok(());
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "Extraction failed");
                surface.warn(&format!("{NO_TEXT_WARNING} ({e})"));
                return Ok(());
            }
        };

        let content = format!("📂 File uploaded: {file_name}\n\n{text}");
        session.add_user(content.as_str())?;
        surface.show_message(Role::User, &content);
        info!(session_id = %session.id, file = %file_name, chars = text.len(), "Document added to transcript");
        session.attachment = Some(Attachment::new(file_name, bytes));
        Ok(())
    }

    async fn answer_image_question(
        &self,
        session: &mut Session,
        question: &str,
        surface: &mut dyn RenderSurface,
    ) -> ZakaiResult<()> {
        session.transition(SessionState::ImageBranch)?;
        let Some(image) = session.pending_image.as_ref() else {
            return Ok(());
        };

        let analysis = self
            .analyzer
            .analyze(&image.bytes, &image.mime, question)
            .await;
        if is_error_reply(&analysis) {
            // The image stays pending so the question can be asked again.
            surface.error(&analysis);
            return Ok(());
        }

        let content = format!(
            "🖼️ Image uploaded: {}\n\nQuestion: {question}\n\nAnalysis:\n{analysis}",
            image.file_name
        );
        session.add_user(content)?;
        session.pending_image = None;
        surface.show_message(Role::User, question);
        surface.show_message(Role::Assistant, &analysis);
        Ok(())
    }

    async fn handle_text(
        &self,
        session: &mut Session,
        text: String,
        surface: &mut dyn RenderSurface,
    ) -> ZakaiResult<()> {
        session.transition(SessionState::TextBranch)?;
        session.add_user(text.as_str())?;
        surface.show_message(Role::User, &text);

        let intent = self.classifier.classify(session, &text);
        info!(session_id = %session.id, intent = ?intent, "Routing text submission");

        match intent {
            Intent::ReviseDocument => {
                self.revise_attachment(session, surface).await;
                Ok(())
            }
            Intent::GenerateImage => self.generate_image(session, &text, surface).await,
            Intent::Chat => self.stream_reply(session, surface).await,
        }
    }

    async fn revise_attachment(&self, session: &Session, surface: &mut dyn RenderSurface) {
        let Some(attachment) = session.attachment.as_ref() else {
            return;
        };
        surface.info(&format!("Reviewing {}...", attachment.file_name));

        let revised = match self
            .reviser
            .revise(&attachment.file_name, &attachment.bytes)
            .await
        {
            Ok(revised) => revised,
            Err(e) => {
                error!(session_id = %session.id, error = %e, "Revision failed");
                surface.error(&format!("Could not revise {}: {e}", attachment.file_name));
                return;
            }
        };

        if revised.suggestions.is_empty() {
            surface.warn("No revision suggestions were returned; the copy is unchanged.");
        }
        if let Err(e) = surface.offer_download(&revised.file_name, &revised.bytes) {
            error!(file = %revised.file_name, error = %e, "Download failed");
            surface.error(&format!("Could not save {}: {e}", revised.file_name));
        }
    }

    async fn generate_image(
        &self,
        session: &mut Session,
        prompt: &str,
        surface: &mut dyn RenderSurface,
    ) -> ZakaiResult<()> {
        match self.generator.generate(prompt).await {
            Ok(url) => {
                surface.show_image_url(&url);
                session.add_assistant(IMAGE_ACKNOWLEDGEMENT)?;
                surface.show_message(Role::Assistant, IMAGE_ACKNOWLEDGEMENT);
            }
            Err(e) => {
                error!(session_id = %session.id, error = %e, "Image generation failed");
                surface.error(&format!("Error generating image: {e}"));
            }
        }
        Ok(())
    }

    async fn stream_reply(&self, session: &mut Session, surface: &mut dyn RenderSurface) -> ZakaiResult<()> {
        let request =
            CompletionRequest::new(self.context.build(session.transcript())).with_max_tokens(self.max_tokens);
        info!(
            session_id = %session.id,
            messages = request.messages.len(),
            estimated_tokens = self.context.estimated_tokens(session.transcript()),
            "Requesting streamed completion"
        );
        session.transition(SessionState::StreamingReply)?;

        let reply = match self.llm.complete_stream(request).await {
            Ok((events, handle)) => self.streamer.consume(events, handle, surface).await,
            Err(e) => StreamedReply::failed(e.to_string()),
        };

        if let Some(reason) = &reply.error {
            error!(session_id = %session.id, reason = %reason, "Completion stream failed");
            surface.error(&format!("Response interrupted: {reason}"));
        }
        session.add_assistant(reply.transcript_text())?;
        Ok(())
    }
}
