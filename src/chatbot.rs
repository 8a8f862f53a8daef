use std::time::Duration;

use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    lifecycle::Mount,
    metrics::{CHAT_REPLIES, STALE_RESULTS_DROPPED},
    schema::{ChatMessage, MessageKind, Sender},
};

pub const WELCOME: &str = "Welcome to the Space AI Assistant! I can help you with questions about space, weather, atmospheric phenomena, and cosmic events. What would you like to explore today?";

/// Checked in order; the first keyword found in the input wins.
pub const KEYWORD_RESPONSES: &[(&str, &str)] = &[
    ("asteroid", "Asteroids are rocky objects that orbit the Sun. Most are found in the asteroid belt between Mars and Jupiter. Near-Earth asteroids are those that come within 1.3 AU of the Sun. NASA tracks potentially hazardous asteroids larger than 140 meters."),
    ("space weather", "Space weather refers to conditions in space caused by solar activity. This includes solar flares, coronal mass ejections, and solar wind that can affect satellites, GPS, and power grids on Earth."),
    ("atmosphere", "Earth's atmosphere is composed of 78% nitrogen, 21% oxygen, and trace amounts of other gases. It extends about 10,000 km above Earth's surface and protects us from harmful solar radiation."),
    ("solar system", "Our solar system consists of the Sun, 8 planets, their moons, asteroids, comets, and other celestial bodies. It formed about 4.6 billion years ago from a collapsing cloud of gas and dust."),
    ("mars", "Mars is the fourth planet from the Sun, known as the Red Planet due to iron oxide on its surface. It has two small moons, Phobos and Deimos, and evidence suggests it once had liquid water."),
    ("moon", "The Moon is Earth's only natural satellite, formed about 4.5 billion years ago. It influences Earth's tides and has been gradually moving away from Earth at about 3.8 cm per year."),
    ("sun", "The Sun is a G-type main-sequence star that provides energy for life on Earth. It's about 4.6 billion years old and will continue burning for another 5 billion years before becoming a red giant."),
    ("galaxy", "The Milky Way is our home galaxy, containing over 100 billion stars. It's a barred spiral galaxy about 100,000 light-years in diameter, and we're located in one of its spiral arms."),
    ("exoplanet", "Exoplanets are planets that orbit stars outside our solar system. Over 5,000 have been discovered, with some potentially habitable worlds in their star's habitable zone."),
    ("black hole", "Black holes are regions of spacetime where gravity is so strong that nothing, not even light, can escape. They form when massive stars collapse at the end of their lives."),
    ("weather", "Weather is driven by the Sun's energy heating Earth unevenly, creating pressure differences that cause wind and weather patterns. Climate change is affecting global weather patterns."),
    ("climate", "Climate is the long-term average of weather patterns. Earth's climate is changing due to increased greenhouse gases from human activities, leading to global warming and extreme weather events."),
];

pub const QUESTION_RESPONSES: [&str; 4] = [
    "That's a fascinating question about space! While I can provide basic information, for the most accurate and up-to-date data, I recommend checking NASA's official resources.",
    "Great question! Space science is constantly evolving. What you're asking about involves complex astrophysics that researchers are still studying.",
    "Interesting! This topic relates to ongoing space research. Scientists use various instruments and missions to gather data about this phenomenon.",
    "Excellent inquiry! This is an active area of space science research. Would you like me to explain the basic principles involved?",
];

pub const DEFAULT_RESPONSES: [&str; 4] = [
    "I'm here to help with space, weather, and atmospheric questions! Could you be more specific about what you'd like to know?",
    "That's an interesting topic! Space science covers many fascinating areas. What specific aspect would you like to explore?",
    "I love discussing space phenomena! Could you rephrase your question or ask about a specific space topic?",
    "As your Space AI Assistant, I'm ready to help! Try asking about planets, stars, weather patterns, or atmospheric science.",
];

pub const QUICK_QUESTIONS: [&str; 6] = [
    "What are asteroids?",
    "How does space weather work?",
    "Tell me about Mars",
    "What causes climate change?",
    "How big is our solar system?",
    "What are black holes?",
];

const MIN_DELAY_MS: u64 = 1000;
const MAX_DELAY_MS: u64 = 3000;

pub fn keyword_response(input: &str) -> Option<&'static str> {
    let lower = input.to_lowercase();
    KEYWORD_RESPONSES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, response)| *response)
}

/// Picks canned replies. The random source is only used for fallbacks and delays.
pub struct Responder<R> {
    rng: R,
}

impl Responder<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Responder<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn respond(&mut self, input: &str) -> &'static str {
        if let Some(response) = keyword_response(input) {
            return response;
        }

        if input.contains('?') {
            self.pick(&QUESTION_RESPONSES)
        } else {
            self.pick(&DEFAULT_RESPONSES)
        }
    }

    /// Uniform in `[1s, 3s)`.
    pub fn reply_delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(MIN_DELAY_MS..MAX_DELAY_MS))
    }

    fn pick(&mut self, choices: &[&'static str]) -> &'static str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

/// Append-only message log for one chat session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are UUIDv7 (time ordered); timestamps never go backwards even if
    /// the wall clock does.
    pub fn push(&mut self, sender: Sender, content: impl Into<String>, kind: Option<MessageKind>) -> &ChatMessage {
        let now = Utc::now();
        let timestamp = match self.messages.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        self.messages.push(ChatMessage {
            id: Uuid::now_v7(),
            content: content.into(),
            sender,
            timestamp,
            kind,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    Composing,
}

/// A reply owed to the user, produced by [`ChatSession::begin`].
#[derive(Debug)]
pub struct PendingReply {
    input: String,
    delay: Duration,
}

impl PendingReply {
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

pub struct ChatSession<R> {
    transcript: Transcript,
    state: ChatState,
    responder: Responder<R>,
    mount: Mount,
}

impl ChatSession<StdRng> {
    pub fn new() -> Self {
        Self::with_responder(Responder::from_entropy())
    }
}

impl Default for ChatSession<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ChatSession<R> {
    pub fn with_responder(responder: Responder<R>) -> Self {
        let mut transcript = Transcript::new();
        transcript.push(Sender::Assistant, WELCOME, Some(MessageKind::Info));

        Self {
            transcript,
            state: ChatState::Idle,
            responder,
            mount: Mount::new(),
        }
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    /// Records the user's message and starts composing a reply. Blank input,
    /// or input arriving while a reply is pending, is ignored.
    pub fn begin(&mut self, input: &str) -> Option<PendingReply> {
        if input.trim().is_empty() || self.state == ChatState::Composing {
            return None;
        }

        self.transcript.push(Sender::User, input, None);
        self.state = ChatState::Composing;

        let delay = self.responder.reply_delay();
        debug!(delay_ms = delay.as_millis() as u64, "Composing reply");
        Some(PendingReply { input: input.to_string(), delay })
    }

    /// Appends exactly one reply and returns to idle. Dropped if the session
    /// was torn down in the meantime.
    pub fn finish(&mut self, pending: PendingReply) -> Option<&ChatMessage> {
        if !self.mount.is_mounted() {
            STALE_RESULTS_DROPPED.inc();
            debug!("Chat session unmounted, discarding reply");
            return None;
        }

        let response = self.responder.respond(&pending.input);
        self.state = ChatState::Idle;
        CHAT_REPLIES.inc();
        info!(len = response.len(), "Assistant replied");
        Some(self.transcript.push(Sender::Assistant, response, Some(MessageKind::Text)))
    }

    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let pending = self.begin(input)?;
        tokio::time::sleep(pending.delay).await;
        self.finish(pending)
    }
}
