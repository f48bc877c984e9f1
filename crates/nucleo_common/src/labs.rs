//! Scoring for the hands-on modules after fundamentals.
//!
//! Each lab wraps a [`ModuleAttempt`] and applies its module's rules as the
//! learner works: points per action, badges on first use, and the
//! end-of-module badges and default creation when the lab is closed.
//! The fundamentals lab lives in `training`.

use crate::course::ModuleAttempt;
use nucleo_shared::{Creation, CreationKind, EthicalDecision, EthicsCase};
use serde::Serialize;
use serde_json::json;

/// Points per chatbot message
pub const MESSAGE_POINTS: u32 = 10;
/// Messages (both sides) needed for `conversational-expert`
pub const MESSAGES_FOR_EXPERT: usize = 5;
pub const DETECTION_POINTS: u32 = 25;
pub const FILTER_POINTS: u32 = 10;
pub const ART_POINTS: u32 = 20;
pub const TEXT_POINTS: u32 = 15;
/// Saved creations needed for `prolific-creator`
pub const CREATIONS_FOR_PROLIFIC: usize = 2;
pub const NETWORK_SIMULATION_POINTS: u32 = 30;
/// Paid for each neural networks section, including the last
pub const NEURAL_SECTION_POINTS: u32 = 25;
pub const DECISION_POINTS: u32 = 25;
pub const ETHICS_SECTION_POINTS: u32 = 30;
pub const ETHICS_FINISH_POINTS: u32 = 50;

// ========== Conversational ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

const POSITIVE_WORDS: &[&str] = &[
    "bueno",
    "excelente",
    "genial",
    "increíble",
    "fantástico",
    "me gusta",
    "perfecto",
    "maravilloso",
];
const NEGATIVE_WORDS: &[&str] = &[
    "malo",
    "terrible",
    "horrible",
    "odio",
    "no me gusta",
    "awful",
    "pésimo",
];

/// Keyword sentiment of a chat message
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let count = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count();
    let positive = count(POSITIVE_WORDS);
    let negative = count(NEGATIVE_WORDS);
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Friendly,
    Professional,
    Creative,
}

impl Personality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Friendly => "friendly",
            Personality::Professional => "professional",
            Personality::Creative => "creative",
        }
    }

    /// Canned answer to `message`, picked by keyword
    pub fn reply(&self, message: &str) -> &'static str {
        let lower = message.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));
        let [greeting, goodbye, technology, default] = match self {
            Personality::Friendly => [
                "¡Hola! Soy tu asistente virtual. ¿En qué te puedo ayudar hoy?",
                "¡Hasta luego! Que tengas un día increíble.",
                "La tecnología está llena de innovación. ¡Cuéntame qué te interesa!",
                "¡Qué interesante! Cuéntame más sobre eso.",
            ],
            Personality::Professional => [
                "Buenos días. Soy un asistente especializado en IA. ¿Cómo puedo asistirle?",
                "Gracias por su consulta. Hasta pronto.",
                "La inteligencia artificial presenta oportunidades importantes para el desarrollo.",
                "Entiendo su consulta. Permítame procesar esa información.",
            ],
            Personality::Creative => [
                "¡Hola, ser creativo! ¿Qué vamos a crear hoy?",
                "¡Que tu creatividad florezca!",
                "La IA es como magia moderna. ¡Imagínate lo que podemos crear juntos!",
                "¡Wow! ¿Y si lo combinamos con algo inesperado?",
            ],
        };
        if has(&["hola", "hi"]) {
            greeting
        } else if has(&["adiós", "bye"]) {
            goodbye
        } else if has(&["tecnología", "tech", "innovación", "ia", "inteligencia artificial"]) {
            technology
        } else {
            default
        }
    }
}

/// The conversational module: a chatbot session with sentiment tracking
#[derive(Debug, Clone, Default)]
pub struct ConversationLab {
    attempt: ModuleAttempt,
    personality: Personality,
    messages: usize,
    positive: usize,
    negative: usize,
}

impl ConversationLab {
    pub fn new(personality: Personality) -> Self {
        Self {
            personality,
            ..Default::default()
        }
    }

    pub fn score(&self) -> u32 {
        self.attempt.score()
    }

    /// Messages exchanged so far, the bot's replies included
    pub fn messages(&self) -> usize {
        self.messages
    }

    /// Send a message and get the bot's reply. Blank messages are ignored.
    pub fn send(&mut self, text: &str) -> Option<(Sentiment, &'static str)> {
        if text.trim().is_empty() {
            return None;
        }
        let sentiment = analyze_sentiment(text);
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => {}
        }
        self.messages += 2;
        self.attempt.add_points(MESSAGE_POINTS);
        Some((sentiment, self.personality.reply(text)))
    }

    pub fn add_creation(&mut self, creation: Creation) {
        self.attempt.add_creation(creation);
    }

    /// Close the lab. Without a saved creation the learner's chatbot is
    /// published as one.
    pub fn into_attempt(mut self, learner: &str) -> ModuleAttempt {
        if self.attempt.creation_count() == 0 {
            let personality = self.personality.as_str();
            let title = format!("Chatbot {} - {}", personality, learner);
            let chatbot = Creation::new(CreationKind::Chatbot, title)
                .with_description(format!(
                    "Chatbot conversacional con personalidad {}",
                    personality
                ))
                .with_data(json!({ "personality": personality, "messagesCount": self.messages }))
                .with_thumbnail("💬")
                .with_tags(["nlp", "chatbot", personality])
                .public();
            self.attempt.add_creation(chatbot);
        }
        if self.messages >= MESSAGES_FOR_EXPERT {
            self.attempt.award("conversational-expert");
        }
        if self.positive > self.negative {
            self.attempt.award("positive-communicator");
        }
        self.attempt
    }
}

// ========== Computer vision ==========

/// The computer vision module: object detection and image filters
#[derive(Debug, Clone, Default)]
pub struct VisionLab {
    attempt: ModuleAttempt,
    detected: Vec<String>,
    filter: Option<String>,
}

impl VisionLab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.attempt.score()
    }

    /// Run detection on an image; the labels replace the previous run's
    pub fn detect<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.detected = labels.into_iter().map(Into::into).collect();
        self.attempt.add_points(DETECTION_POINTS);
        self.attempt.award("object-detector");
    }

    /// Pick an image filter. `"none"` clears it but still scores.
    pub fn apply_filter(&mut self, filter: &str) {
        self.filter = (filter != "none").then(|| filter.to_string());
        self.attempt.add_points(FILTER_POINTS);
    }

    pub fn add_creation(&mut self, creation: Creation) {
        self.attempt.add_creation(creation);
    }

    pub fn into_attempt(mut self, learner: &str) -> ModuleAttempt {
        if self.attempt.creation_count() == 0 {
            let title = format!("Análisis Visual - {}", learner);
            let analysis = Creation::new(CreationKind::VisionAnalysis, title)
                .with_description("Reconocimiento de objetos y clasificación de imágenes")
                .with_data(json!({
                    "detectedObjects": self.detected,
                    "filterUsed": self.filter.as_deref().unwrap_or("none"),
                }))
                .with_thumbnail("👁️")
                .with_tags(["computer-vision", "object-detection", "image-classification"])
                .public();
            self.attempt.add_creation(analysis);
        }
        if !self.detected.is_empty() {
            self.attempt.award("vision-expert");
        }
        if self.filter.is_some() {
            self.attempt.award("filter-artist");
        }
        self.attempt
    }
}

// ========== Generative ==========

/// The generative module: algorithmic art and text generation
#[derive(Debug, Clone, Default)]
pub struct GenerativeLab {
    attempt: ModuleAttempt,
    artworks: usize,
    texts: usize,
}

impl GenerativeLab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.attempt.score()
    }

    /// Generate and keep an artwork with `algorithm` and `palette`
    pub fn generate_art(&mut self, algorithm: &str, palette: &str, learner: &str) {
        let art = Creation::new(CreationKind::Art, format!("Arte {} - {}", algorithm, learner))
            .with_description(format!("Creado con algoritmo {}, paleta {}", algorithm, palette))
            .with_data(json!({ "params": { "algorithm": algorithm, "colors": palette } }))
            .with_thumbnail("🎨")
            .with_tags(["generative-art", algorithm, palette])
            .public();
        self.attempt.add_creation(art);
        self.artworks += 1;
        self.attempt.add_points(ART_POINTS);
        self.attempt.award("digital-artist");
    }

    pub fn generate_text(&mut self) {
        self.texts += 1;
        self.attempt.add_points(TEXT_POINTS);
        self.attempt.award("text-generator");
    }

    pub fn into_attempt(mut self, learner: &str) -> ModuleAttempt {
        if self.attempt.creation_count() >= CREATIONS_FOR_PROLIFIC {
            self.attempt.award("prolific-creator");
        }
        if self.artworks > 0 {
            self.attempt.award("generative-artist");
        }
        if self.attempt.creation_count() == 0 {
            let exploration = Creation::new(
                CreationKind::GenerativeExploration,
                format!("Exploración Generativa - {}", learner),
            )
            .with_description("Experimentación con IA generativa y arte algorítmico")
            .with_data(json!({ "textsGenerated": self.texts }))
            .with_thumbnail("🎨")
            .with_tags(["generative-ai", "creativity", "art"])
            .public();
            self.attempt.add_creation(exploration);
        }
        self.attempt
    }
}

// ========== Neural networks ==========

/// The neural networks module: architecture simulations across sections
#[derive(Debug, Clone, Default)]
pub struct NeuralLab {
    attempt: ModuleAttempt,
    simulations: usize,
}

impl NeuralLab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.attempt.score()
    }

    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// A network simulation ran to the end
    pub fn finish_simulation(&mut self) {
        self.simulations += 1;
        self.attempt.add_points(NETWORK_SIMULATION_POINTS);
        self.attempt.award("neural-architect");
    }

    pub fn complete_section(&mut self) {
        self.attempt.add_points(NEURAL_SECTION_POINTS);
    }

    /// Close the lab; the last section scores like the others
    pub fn into_attempt(mut self) -> ModuleAttempt {
        self.attempt.add_points(NEURAL_SECTION_POINTS);
        self.attempt.award("neural-networks-master");
        self.attempt
    }
}

// ========== Ethics ==========

/// The ethics module: deciding cases and working through its sections
#[derive(Debug, Clone, Default)]
pub struct EthicsLab {
    attempt: ModuleAttempt,
    decisions: Vec<EthicalDecision>,
}

impl EthicsLab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.attempt.score()
    }

    pub fn decisions(&self) -> &[EthicalDecision] {
        &self.decisions
    }

    /// Choose `option_id` in `case`. Unknown options change nothing.
    pub fn decide(
        &mut self,
        case: &EthicsCase,
        option_id: &str,
        reasoning: &str,
    ) -> Option<&EthicalDecision> {
        let decision = case.decide(option_id, reasoning)?;
        self.attempt.add_points(DECISION_POINTS);
        self.attempt.award("ethical-decision-maker");
        self.decisions.push(decision);
        self.decisions.last()
    }

    pub fn complete_section(&mut self) {
        self.attempt.add_points(ETHICS_SECTION_POINTS);
    }

    pub fn into_attempt(mut self) -> ModuleAttempt {
        self.attempt.add_points(ETHICS_FINISH_POINTS);
        self.attempt.award("global-ethics-expert");
        for decision in self.decisions {
            self.attempt.add_decision(decision);
        }
        self.attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProgressStore;
    use nucleo_shared::content::{CaseContext, EthicsOption, Rating};
    use nucleo_shared::Impact;

    #[test]
    fn test_sentiment_keywords() {
        assert_eq!(analyze_sentiment("¡Esto es genial y perfecto!"), Sentiment::Positive);
        assert_eq!(analyze_sentiment("Qué servicio tan pésimo"), Sentiment::Negative);
        assert_eq!(analyze_sentiment("Voy al metro"), Sentiment::Neutral);
    }

    #[test]
    fn test_personality_replies() {
        assert_eq!(
            Personality::Professional.reply("hola"),
            "Buenos días. Soy un asistente especializado en IA. ¿Cómo puedo asistirle?"
        );
        assert_eq!(Personality::Creative.reply("bye"), "¡Que tu creatividad florezca!");
    }

    #[test]
    fn test_conversation_scoring() {
        let mut lab = ConversationLab::new(Personality::Friendly);
        assert!(lab.send("   ").is_none());
        lab.send("Hola, esto es excelente").unwrap();
        lab.send("me gusta la tecnología").unwrap();
        assert_eq!(lab.score(), 20);
        assert_eq!(lab.messages(), 4);

        let short = lab.clone().into_attempt("Ana");
        assert!(!short.has_award("conversational-expert"));
        assert!(short.has_award("positive-communicator"));

        lab.send("qué horrible").unwrap();
        let attempt = lab.into_attempt("Ana");
        assert_eq!(attempt.score(), 30);
        assert!(attempt.has_award("conversational-expert"));
        assert!(attempt.has_award("positive-communicator"));

        let outcome = attempt.into_outcome();
        let chatbot = &outcome.creations[0];
        assert_eq!(chatbot.kind, CreationKind::Chatbot);
        assert_eq!(chatbot.title, "Chatbot friendly - Ana");
        assert_eq!(chatbot.thumbnail, "💬");
        assert!(chatbot.is_public);
        assert_eq!(chatbot.data["messagesCount"], 6);
    }

    #[test]
    fn test_conversation_keeps_saved_creation() {
        let mut lab = ConversationLab::new(Personality::Creative);
        lab.send("odio los lunes").unwrap();
        lab.add_creation(Creation::new(CreationKind::Chatbot, "Parcero bot"));
        let outcome = lab.into_attempt("Ana").into_outcome();
        assert_eq!(outcome.creations.len(), 1);
        assert_eq!(outcome.creations[0].title, "Parcero bot");
        assert!(outcome.achievements.is_empty());
    }

    #[test]
    fn test_vision_badges() {
        let mut lab = VisionLab::new();
        lab.apply_filter("none");
        let attempt = lab.clone().into_attempt("Luis");
        assert_eq!(attempt.score(), 10);
        assert!(attempt.achievements().is_empty());

        lab.detect(["Tren", "Estación"]);
        lab.detect(["Personas"]);
        lab.apply_filter("vintage");
        let attempt = lab.into_attempt("Luis");
        assert_eq!(attempt.score(), 10 + 50 + 10);
        assert_eq!(
            attempt.achievements(),
            ["object-detector", "vision-expert", "filter-artist"]
        );
        let outcome = attempt.into_outcome();
        assert_eq!(outcome.creations[0].kind, CreationKind::VisionAnalysis);
        assert_eq!(outcome.creations[0].data["detectedObjects"][0], "Personas");
    }

    #[test]
    fn test_generative_badges() {
        let mut lab = GenerativeLab::new();
        lab.generate_text();
        let attempt = lab.clone().into_attempt("Sofía");
        assert_eq!(attempt.achievements(), ["text-generator"]);
        assert_eq!(attempt.creation_count(), 1);

        lab.generate_art("fractal", "tropical", "Sofía");
        lab.generate_art("waves", "sunset", "Sofía");
        let attempt = lab.into_attempt("Sofía");
        assert_eq!(attempt.score(), 15 + 40);
        assert!(attempt.has_award("digital-artist"));
        assert!(attempt.has_award("prolific-creator"));
        assert!(attempt.has_award("generative-artist"));
        let outcome = attempt.into_outcome();
        assert_eq!(outcome.creations.len(), 2);
        assert_eq!(outcome.creations[0].title, "Arte fractal - Sofía");
    }

    #[test]
    fn test_neural_sections() {
        let mut lab = NeuralLab::new();
        lab.finish_simulation();
        lab.complete_section();
        lab.complete_section();
        let attempt = lab.into_attempt();
        assert_eq!(attempt.score(), 30 + 75);
        assert_eq!(attempt.achievements(), ["neural-architect", "neural-networks-master"]);
    }

    fn surveillance_case() -> EthicsCase {
        let option = |id: &str, social_impact| EthicsOption {
            id: id.to_string(),
            text: id.to_string(),
            consequences: Vec::new(),
            ethical_principles: Vec::new(),
            social_impact,
            technical_feasibility: Rating::High,
        };
        EthicsCase {
            id: "smart-nation".to_string(),
            title: "Vigilancia vs Seguridad".to_string(),
            scenario: "Cámaras con IA en toda la ciudad".to_string(),
            context: CaseContext::Global,
            stakeholders: Vec::new(),
            options: vec![
                option("full-surveillance", Rating::Low),
                option("regulated-system", Rating::High),
            ],
            real_outcome: None,
            discussion_points: Vec::new(),
        }
    }

    #[test]
    fn test_ethics_decisions_flow_into_stats() {
        let case = surveillance_case();
        let mut lab = EthicsLab::new();
        assert!(lab.decide(&case, "ban-everything", "").is_none());
        assert_eq!(lab.score(), 0);

        let decision = lab.decide(&case, "regulated-system", "Auditorías independientes").unwrap();
        assert_eq!(decision.impact, Impact::Positive);
        assert_eq!(decision.reasoning, "Auditorías independientes");
        lab.decide(&case, "full-surveillance", "").unwrap();
        lab.complete_section();
        lab.complete_section();
        let attempt = lab.into_attempt();
        assert_eq!(attempt.score(), 50 + 60 + 50);
        assert_eq!(attempt.achievements(), ["ethical-decision-maker", "global-ethics-expert"]);

        let mut store = ProgressStore::new();
        store.complete_module("ethics", attempt.into_outcome());
        let stats = store.ethical_decision_stats();
        assert_eq!((stats.positive, stats.negative, stats.total), (1, 1, 2));
        assert_eq!(stats.average_social_score, 5.0);
        assert_eq!(store.user_profile().ethics_score, 10);
    }
}
