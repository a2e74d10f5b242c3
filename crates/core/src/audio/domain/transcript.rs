/// One unit of recognized speech as emitted by the transcription
/// capability, in temporal order.
#[derive(Clone, Debug, PartialEq)]
pub struct SentenceFragment {
    /// Speaker identity, when the capability attributed one.
    pub speaker: Option<u32>,
    pub text: String,
    /// Start of the spoken span, seconds from clip start.
    pub start: f64,
    /// End of the spoken span, seconds from clip start.
    pub end: f64,
}

impl SentenceFragment {
    /// Whether the fragment carries mergeable content: an attributed
    /// speaker and non-empty text.
    pub fn contributes(&self) -> bool {
        self.speaker.is_some() && !self.text.is_empty()
    }
}

/// A maximal run of consecutive fragments from one speaker.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeakerTurn {
    pub speaker: u32,
    pub text: String,
}
