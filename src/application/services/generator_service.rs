//! Campaign generator - The staged generation pipeline
//!
//! A `CampaignGenerator` owns the growing campaign graph and drives the
//! five generation stages in dependency order: overview, then locations and
//! characters, then encounters, then actions per encounter. Each stage is a
//! one-time transition gated on existing state; on any transport, parse or
//! schema failure the stage aborts with the graph untouched.

use serde_json::Value;

use crate::application::ports::outbound::{ChatError, ChatPort};
use crate::application::services::llm::{
    extract_array, extract_object, prompt_builder, ResponseParseError,
};
use crate::domain::entities::{
    Action, Character, LevelUpEvent, Location, Overview, SchemaViolation,
};
use crate::domain::value_objects::GeneratorConfig;

/// Errors that abort a generation stage
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
    #[error("chat transport failed: {0}")]
    Transport(#[from] ChatError),
    #[error(transparent)]
    Parse(#[from] ResponseParseError),
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    #[error("failed to encode prompt context: {0}")]
    Context(#[from] serde_json::Error),
}

/// A stage was invoked out of dependency order, or re-invoked after its
/// one-shot slot was already filled. State is never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionViolation {
    #[error("overview has already been generated")]
    OverviewAlreadyGenerated,
    #[error("no overview has been generated yet")]
    OverviewMissing,
    #[error("locations have already been generated")]
    LocationsAlreadyGenerated,
    #[error("no locations have been generated yet")]
    LocationsMissing,
    #[error("characters have already been generated")]
    CharactersAlreadyGenerated,
    #[error("no characters have been generated yet")]
    CharactersMissing,
    #[error("character index {0} is out of range")]
    CharacterOutOfRange(usize),
    #[error("a location already has encounters")]
    EncountersAlreadyGenerated,
    #[error("location {0} has no encounters yet")]
    EncountersMissing(usize),
    #[error("encounter {encounter} at location {location} already has actions")]
    ActionsAlreadyGenerated { location: usize, encounter: usize },
    #[error("location index {0} is out of range")]
    LocationOutOfRange(usize),
    #[error("encounter index {0} is out of range")]
    EncounterOutOfRange(usize),
}

/// A non-fatal mismatch observed while merging a batched response back into
/// the graph by position. Logged and recorded, never blocks the merge.
#[derive(Debug, Clone)]
pub enum CorrelationAnomaly {
    /// The entity at a position came back under a different name
    NameMismatch {
        stage: &'static str,
        index: usize,
        expected: String,
        returned: String,
    },
    /// The response batch differs in length from the input batch
    LengthMismatch {
        stage: &'static str,
        expected: usize,
        returned: usize,
    },
}

impl std::fmt::Display for CorrelationAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrelationAnomaly::NameMismatch {
                stage,
                index,
                expected,
                returned,
            } => write!(
                f,
                "{stage} stage, position {index}: sent \"{expected}\", received \"{returned}\""
            ),
            CorrelationAnomaly::LengthMismatch {
                stage,
                expected,
                returned,
            } => write!(
                f,
                "{stage} stage: sent {expected} entries, received {returned}"
            ),
        }
    }
}

/// Stateful generator for one campaign.
///
/// The generator exclusively owns the campaign graph for its lifetime.
/// Callers drive the stages in dependency order and serialize their own
/// calls; there is no internal locking and no retry.
pub struct CampaignGenerator<C: ChatPort> {
    chat: C,
    theme: String,
    config: GeneratorConfig,
    overview: Option<Overview>,
    characters: Option<Vec<Character>>,
    locations: Option<Vec<Location>>,
    anomalies: Vec<CorrelationAnomaly>,
}

impl<C: ChatPort> CampaignGenerator<C> {
    pub fn new(chat: C, theme: impl Into<String>, config: GeneratorConfig) -> Self {
        Self {
            chat,
            theme: theme.into(),
            config,
            overview: None,
            characters: None,
            locations: None,
            anomalies: Vec::new(),
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn overview(&self) -> Option<&Overview> {
        self.overview.as_ref()
    }

    pub fn characters(&self) -> Option<&[Character]> {
        self.characters.as_deref()
    }

    pub fn locations(&self) -> Option<&[Location]> {
        self.locations.as_deref()
    }

    /// Correlation anomalies recorded so far, in observation order
    pub fn anomalies(&self) -> &[CorrelationAnomaly] {
        &self.anomalies
    }

    /// Generate the campaign overview. Fails if one already exists.
    pub async fn create_overview(&mut self) -> Result<&Overview, GenerationError> {
        if self.overview.is_some() {
            return Err(PreconditionViolation::OverviewAlreadyGenerated.into());
        }

        tracing::info!(theme = %self.theme, "Generating campaign overview");
        let messages = prompt_builder::overview_messages(&self.theme);
        let reply = self.chat.complete(&messages).await?;
        let overview = Overview::from_response(Value::Object(extract_object(&reply)?))?;

        Ok(self.overview.insert(overview))
    }

    /// Generate the location list. Requires an overview; fails if locations
    /// were already generated.
    pub async fn create_locations(&mut self) -> Result<&[Location], GenerationError> {
        let overview = self
            .overview
            .as_ref()
            .ok_or(PreconditionViolation::OverviewMissing)?;
        if self.locations.is_some() {
            return Err(PreconditionViolation::LocationsAlreadyGenerated.into());
        }

        tracing::info!(count = self.config.location_count, "Generating locations");
        let messages =
            prompt_builder::location_messages(&self.theme, overview, self.config.location_count)?;
        let reply = self.chat.complete(&messages).await?;
        let locations = Location::from_response_list(extract_array(&reply)?)?;

        Ok(self.locations.insert(locations))
    }

    /// Generate the hero roster. Requires an overview; fails if characters
    /// were already generated.
    pub async fn create_characters(&mut self) -> Result<&[Character], GenerationError> {
        let overview = self
            .overview
            .as_ref()
            .ok_or(PreconditionViolation::OverviewMissing)?;
        if self.characters.is_some() {
            return Err(PreconditionViolation::CharactersAlreadyGenerated.into());
        }

        tracing::info!(count = self.config.character_count, "Generating characters");
        let messages =
            prompt_builder::character_messages(&self.theme, overview, self.config.character_count)?;
        let reply = self.chat.complete(&messages).await?;
        let characters = Character::from_response_list(extract_array(&reply)?)?;

        Ok(self.characters.insert(characters))
    }

    /// Generate encounters for every location in one batched request.
    ///
    /// The returned location list is merged back positionally; a name that
    /// comes back different is recorded as an anomaly but the positional
    /// pairing stays authoritative.
    pub async fn create_encounters(&mut self) -> Result<&[Location], GenerationError> {
        let overview = self
            .overview
            .as_ref()
            .ok_or(PreconditionViolation::OverviewMissing)?;
        let locations = self
            .locations
            .as_ref()
            .ok_or(PreconditionViolation::LocationsMissing)?;
        if locations.iter().any(Location::has_encounters) {
            return Err(PreconditionViolation::EncountersAlreadyGenerated.into());
        }

        tracing::info!(locations = locations.len(), "Generating encounters");
        let messages = prompt_builder::encounter_messages(&self.theme, overview, locations)?;
        let reply = self.chat.complete(&messages).await?;
        let returned = Location::from_response_list(extract_array(&reply)?)?;

        // Decode the whole batch before touching state, so a violation in a
        // later entry cannot leave the merge half-applied.
        let mut batches = Vec::with_capacity(returned.len());
        for location in returned {
            let encounters = location.encounters.ok_or_else(|| SchemaViolation {
                entity: "location",
                message: format!("\"{}\" is missing its encounters list", location.name),
            })?;
            batches.push((location.name, encounters));
        }

        if batches.len() != locations.len() {
            self.record_anomaly(CorrelationAnomaly::LengthMismatch {
                stage: "encounters",
                expected: locations.len(),
                returned: batches.len(),
            });
        }

        let locations = self
            .locations
            .as_mut()
            .ok_or(PreconditionViolation::LocationsMissing)?;
        let mut anomalies = Vec::new();
        for (index, (location, (returned_name, encounters))) in
            locations.iter_mut().zip(batches).enumerate()
        {
            if location.name != returned_name {
                anomalies.push(CorrelationAnomaly::NameMismatch {
                    stage: "encounters",
                    index,
                    expected: location.name.clone(),
                    returned: returned_name,
                });
            }
            location.attach_encounters(encounters);
        }
        for anomaly in anomalies {
            self.record_anomaly(anomaly);
        }

        Ok(self
            .locations
            .as_deref()
            .unwrap_or_default())
    }

    /// Generate candidate actions for one encounter, addressed by position.
    ///
    /// Fails if the addressed encounter does not exist or already has
    /// actions.
    pub async fn create_actions(
        &mut self,
        location_index: usize,
        encounter_index: usize,
    ) -> Result<&[Action], GenerationError> {
        let overview = self
            .overview
            .as_ref()
            .ok_or(PreconditionViolation::OverviewMissing)?;
        let locations = self
            .locations
            .as_ref()
            .ok_or(PreconditionViolation::LocationsMissing)?;
        let location = locations
            .get(location_index)
            .ok_or(PreconditionViolation::LocationOutOfRange(location_index))?;
        let encounters = location
            .encounters
            .as_ref()
            .ok_or(PreconditionViolation::EncountersMissing(location_index))?;
        let encounter = encounters
            .get(encounter_index)
            .ok_or(PreconditionViolation::EncounterOutOfRange(encounter_index))?;
        if encounter.has_actions() {
            return Err(PreconditionViolation::ActionsAlreadyGenerated {
                location: location_index,
                encounter: encounter_index,
            }
            .into());
        }

        tracing::info!(
            location = %location.name,
            encounter = %encounter.name,
            "Generating actions"
        );
        let messages = prompt_builder::action_messages(&self.theme, overview, location, encounter)?;
        let reply = self.chat.complete(&messages).await?;
        let actions = Action::from_response_list(extract_array(&reply)?)?;

        let slot = self
            .locations
            .as_mut()
            .and_then(|locations| locations.get_mut(location_index))
            .and_then(|location| location.encounters.as_mut())
            .and_then(|encounters| encounters.get_mut(encounter_index))
            .ok_or(PreconditionViolation::EncounterOutOfRange(encounter_index))?;
        slot.attach_actions(actions);

        Ok(slot.actions.as_deref().unwrap_or_default())
    }

    /// Generate a backstory level-up event for one character, addressed by
    /// position.
    ///
    /// The event is returned to the caller and not merged into the graph, so
    /// unlike the batch stages this may be invoked repeatedly for the same
    /// hero.
    pub async fn create_level_up(
        &self,
        character_index: usize,
    ) -> Result<LevelUpEvent, GenerationError> {
        let overview = self
            .overview
            .as_ref()
            .ok_or(PreconditionViolation::OverviewMissing)?;
        let characters = self
            .characters
            .as_ref()
            .ok_or(PreconditionViolation::CharactersMissing)?;
        let character = characters
            .get(character_index)
            .ok_or(PreconditionViolation::CharacterOutOfRange(character_index))?;

        tracing::info!(character = %character.name, "Generating level-up event");
        let messages = prompt_builder::level_up_messages(&self.theme, overview, character)?;
        let reply = self.chat.complete(&messages).await?;
        let event = LevelUpEvent::from_response(Value::Object(extract_object(&reply)?))?;

        Ok(event)
    }

    fn record_anomaly(&mut self, anomaly: CorrelationAnomaly) {
        tracing::warn!("Correlation anomaly: {}", anomaly);
        self.anomalies.push(anomaly);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::ChatMessage;
    use crate::domain::value_objects::{Attribute, Difficulty};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Chat port that replays a fixed script of replies
    struct ScriptedChat {
        replies: Mutex<VecDeque<String>>,
    }

    impl ScriptedChat {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl ChatPort for ScriptedChat {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, ChatError> {
            self.replies
                .lock()
                .expect("script lock poisoned")
                .pop_front()
                .ok_or_else(|| ChatError::RequestFailed("script exhausted".to_string()))
        }
    }

    const OVERVIEW_REPLY: &str =
        r#"{"name": "The Sunken Reach", "description": "A drowned borderland where the levees broke a generation ago. The Pale Tide rises each season and swallows another village. An old beacon on the high fen is said to still hold back the water."}"#;

    const LOCATIONS_REPLY: &str = r#"[
        {"name": "The Drowned Chapel", "description": "A chapel below the waterline, its bell still ringing."},
        {"name": "Beacon Fen", "description": "The last high ground, crowned by a dying lighthouse."}
    ]"#;

    const CHARACTERS_REPLY: &str = r#"[
        {"name": "Maera", "title": "Wayfinder", "description": "A wiry scout with a cracked compass.", "backstory": "She led a caravan into the fog and came back alone.", "strength": "mental", "weakness": "emotional"},
        {"name": "Bror", "title": "Breakwater", "description": "A dockhand built like a seawall.", "backstory": "He held a floodgate shut for a night and a day.", "strength": "physical", "weakness": null},
        {"name": "Ysolt", "title": "Lantern", "description": "A quiet keeper of the old beacon rites.", "backstory": "She swore an oath to a light she has never seen lit.", "strength": "emotional", "weakness": "physical"}
    ]"#;

    const ENCOUNTERS_REPLY: &str = r#"[
        {"name": "The Drowned Chapel", "encounters": [
            {"name": "Bell Toll", "description": "The bell rings beneath the water as you approach. Each toll draws pale shapes closer to the surface.", "difficulty": "easy"},
            {"name": "Flooded Nave", "description": "You must cross the nave where the floor has given way. The water between the pews is moving against the current.", "difficulty": "medium"},
            {"name": "The Warden", "description": "The chapel's warden still keeps his post below. He does not believe he has drowned, and he will not let you pass the altar.", "difficulty": "hard"}
        ]},
        {"name": "Beacon Fen", "encounters": [
            {"name": "Mud Lights", "description": "Lights flicker out in the fen, always just off the safe path. Your own lanterns are starting to gutter in answer.", "difficulty": "easy"},
            {"name": "Keeper's Door", "description": "The lighthouse door is barred from inside. Whoever is in there whispers through the keyhole in your own voices.", "difficulty": "medium"},
            {"name": "Dark Beacon", "description": "The beacon room is flooded with something that is not water. It remembers every light that ever burned here, and it is hungry for one more.", "difficulty": "hard"}
        ]}
    ]"#;

    const ACTIONS_REPLY: &str = r#"[
        {"description": "Dive and muffle the bell with your cloaks.", "attribute": "physical", "difficulty": "medium", "success": "The bell falls silent and the pale shapes sink away. You surface into still water.", "failure": "The bell slips its mount and tolls once, loud. Everything in the water turns toward you."},
        {"description": "Chart the tolling pattern and time your crossing between rings.", "attribute": "mental", "difficulty": "easy", "success": "You slip through in the silence between tolls. The shapes never notice you.", "failure": "The pattern breaks on the seventh toll. You are caught mid-crossing in open water."},
        {"description": "Answer the bell with the funeral hymn it is tolling for.", "attribute": "emotional", "difficulty": "hard", "success": "The ringing softens and ends. The water feels, briefly, at peace.", "failure": "Your voices crack on the last verse. The bell rings faster, and for you."}
    ]"#;

    const LEVEL_UP_REPLY: &str = r#"{
        "name": "Fog Bell",
        "description": "The bell you fled from rings again across the marsh, and the sound carries the names of the caravan you lost. The fog parts into a straight road toward its source, the sunken belfry of Saint Maren. Nobody else seems to hear it.",
        "choices": [
            {"description": "Walk the fog road and answer for the night you ran.", "attribute": "emotional", "outcome": "You stand beneath the belfry and let the tolling wash over you. The lost are not angry, only waiting, and the weight you carried was never theirs."},
            {"description": "Chart the fog currents to find who is really ringing the bell.", "attribute": "mental", "outcome": "The pattern leads you to a living hand on the rope. Your past had an author, and now it has a face."},
            {"description": "Dive to the belfry and cut the bell down yourself.", "attribute": "physical", "outcome": "The rope parts and the marsh falls silent for the first time in years. Whatever wanted you to hear it will have to speak plainly now."}
        ]
    }"#;

    fn generator(replies: &[&str]) -> CampaignGenerator<ScriptedChat> {
        CampaignGenerator::new(
            ScriptedChat::new(replies),
            "haunted marsh",
            GeneratorConfig {
                location_count: 2,
                character_count: 3,
            },
        )
    }

    #[tokio::test]
    async fn test_overview_cannot_be_generated_twice() {
        let mut generator = generator(&[OVERVIEW_REPLY, OVERVIEW_REPLY]);

        generator.create_overview().await.unwrap();
        let err = generator.create_overview().await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Precondition(PreconditionViolation::OverviewAlreadyGenerated)
        ));
        // State remains exactly as set by the first call
        assert_eq!(
            generator.overview().unwrap().name.as_deref(),
            Some("The Sunken Reach")
        );
    }

    #[tokio::test]
    async fn test_locations_require_overview() {
        let mut generator = generator(&[LOCATIONS_REPLY]);

        let err = generator.create_locations().await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Precondition(PreconditionViolation::OverviewMissing)
        ));
        assert!(generator.locations().is_none());
    }

    #[tokio::test]
    async fn test_characters_are_one_shot() {
        let mut generator = generator(&[OVERVIEW_REPLY, CHARACTERS_REPLY, CHARACTERS_REPLY]);

        generator.create_overview().await.unwrap();
        generator.create_characters().await.unwrap();
        let err = generator.create_characters().await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Precondition(PreconditionViolation::CharactersAlreadyGenerated)
        ));
    }

    #[tokio::test]
    async fn test_full_pipeline_haunted_marsh() {
        let mut generator = generator(&[
            OVERVIEW_REPLY,
            LOCATIONS_REPLY,
            CHARACTERS_REPLY,
            ENCOUNTERS_REPLY,
            ACTIONS_REPLY,
        ]);

        let overview = generator.create_overview().await.unwrap();
        assert_eq!(overview.name.as_deref(), Some("The Sunken Reach"));

        let locations = generator.create_locations().await.unwrap();
        assert_eq!(locations.len(), 2);

        let characters = generator.create_characters().await.unwrap();
        assert_eq!(characters.len(), 3);
        for character in characters {
            for attribute in [character.strength, character.weakness] {
                assert!(matches!(
                    attribute,
                    None | Some(Attribute::Physical)
                        | Some(Attribute::Mental)
                        | Some(Attribute::Emotional)
                ));
            }
        }

        let locations = generator.create_encounters().await.unwrap();
        for location in locations {
            let encounters = location.encounters.as_ref().unwrap();
            let difficulties: Vec<Difficulty> =
                encounters.iter().map(|e| e.difficulty).collect();
            assert_eq!(
                difficulties,
                vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
            );
        }

        let actions = generator.create_actions(0, 0).await.unwrap();
        assert_eq!(actions.len(), 3);
        for action in actions {
            assert!(!action.success.description.is_empty());
            assert!(!action.failure.description.is_empty());
        }
        assert!(generator.anomalies().is_empty());
    }

    #[tokio::test]
    async fn test_encounter_name_mismatch_is_recorded_not_fatal() {
        let mismatched = ENCOUNTERS_REPLY.replace("Beacon Fen", "The Beacon Fen");
        let mut generator = generator(&[OVERVIEW_REPLY, LOCATIONS_REPLY, mismatched.as_str()]);

        generator.create_overview().await.unwrap();
        generator.create_locations().await.unwrap();
        let locations = generator.create_encounters().await.unwrap();

        // Merge succeeded positionally despite the renamed second entry
        assert!(locations.iter().all(Location::has_encounters));
        assert_eq!(generator.anomalies().len(), 1);
        match &generator.anomalies()[0] {
            CorrelationAnomaly::NameMismatch {
                index,
                expected,
                returned,
                ..
            } => {
                assert_eq!(*index, 1);
                assert_eq!(expected, "Beacon Fen");
                assert_eq!(returned, "The Beacon Fen");
            }
            other => panic!("unexpected anomaly: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_encounter_length_mismatch_merges_common_prefix() {
        // Reply covers only the first of the two locations sent
        let short = r#"[
            {"name": "The Drowned Chapel", "encounters": [
                {"name": "Bell Toll", "description": "The bell rings beneath the water. Each toll draws pale shapes closer.", "difficulty": "easy"},
                {"name": "Flooded Nave", "description": "The floor has given way. The water between the pews moves against the current.", "difficulty": "medium"},
                {"name": "The Warden", "description": "The warden still keeps his post below. He will not let you pass the altar.", "difficulty": "hard"}
            ]}
        ]"#;
        let mut generator = generator(&[OVERVIEW_REPLY, LOCATIONS_REPLY, short]);

        generator.create_overview().await.unwrap();
        generator.create_locations().await.unwrap();
        let locations = generator.create_encounters().await.unwrap();

        // The covered prefix is merged; the uncovered location stays empty
        assert!(locations[0].has_encounters());
        assert!(!locations[1].has_encounters());
        assert_eq!(generator.anomalies().len(), 1);
        match &generator.anomalies()[0] {
            CorrelationAnomaly::LengthMismatch {
                expected, returned, ..
            } => {
                assert_eq!(*expected, 2);
                assert_eq!(*returned, 1);
            }
            other => panic!("unexpected anomaly: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_level_up_returns_event_without_mutating_state() {
        let mut generator = generator(&[
            OVERVIEW_REPLY,
            CHARACTERS_REPLY,
            LEVEL_UP_REPLY,
            LEVEL_UP_REPLY,
        ]);

        generator.create_overview().await.unwrap();
        generator.create_characters().await.unwrap();

        let event = generator.create_level_up(0).await.unwrap();
        assert_eq!(event.name, "Fog Bell");
        assert_eq!(event.choices.len(), 3);
        let attributes: Vec<Attribute> =
            event.choices.iter().map(|choice| choice.attribute).collect();
        assert!(attributes.contains(&Attribute::Emotional));
        assert!(attributes.contains(&Attribute::Mental));
        assert!(attributes.contains(&Attribute::Physical));

        // Not a one-shot stage: the same hero can level up again
        let again = generator.create_level_up(0).await.unwrap();
        assert_eq!(again.name, "Fog Bell");
    }

    #[tokio::test]
    async fn test_level_up_requires_characters() {
        let mut generator = generator(&[OVERVIEW_REPLY, LEVEL_UP_REPLY]);

        generator.create_overview().await.unwrap();
        let err = generator.create_level_up(0).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Precondition(PreconditionViolation::CharactersMissing)
        ));
    }

    #[tokio::test]
    async fn test_level_up_rejects_out_of_range_character() {
        let mut generator = generator(&[OVERVIEW_REPLY, CHARACTERS_REPLY, LEVEL_UP_REPLY]);

        generator.create_overview().await.unwrap();
        generator.create_characters().await.unwrap();
        let err = generator.create_level_up(7).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Precondition(PreconditionViolation::CharacterOutOfRange(7))
        ));
    }

    #[tokio::test]
    async fn test_encounters_cannot_be_generated_twice() {
        let mut generator = generator(&[
            OVERVIEW_REPLY,
            LOCATIONS_REPLY,
            ENCOUNTERS_REPLY,
            ENCOUNTERS_REPLY,
        ]);

        generator.create_overview().await.unwrap();
        generator.create_locations().await.unwrap();
        generator.create_encounters().await.unwrap();
        let err = generator.create_encounters().await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Precondition(PreconditionViolation::EncountersAlreadyGenerated)
        ));
    }

    #[tokio::test]
    async fn test_actions_cannot_be_generated_twice_for_same_encounter() {
        let mut generator = generator(&[
            OVERVIEW_REPLY,
            LOCATIONS_REPLY,
            ENCOUNTERS_REPLY,
            ACTIONS_REPLY,
            ACTIONS_REPLY,
        ]);

        generator.create_overview().await.unwrap();
        generator.create_locations().await.unwrap();
        generator.create_encounters().await.unwrap();
        generator.create_actions(1, 2).await.unwrap();
        let err = generator.create_actions(1, 2).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Precondition(PreconditionViolation::ActionsAlreadyGenerated {
                location: 1,
                encounter: 2,
            })
        ));
    }

    #[tokio::test]
    async fn test_malformed_reply_leaves_state_untouched() {
        let mut generator = generator(&[
            OVERVIEW_REPLY,
            "I'd be happy to help, but I can't answer in JSON.",
        ]);

        generator.create_overview().await.unwrap();
        let err = generator.create_locations().await.unwrap_err();
        match &err {
            GenerationError::Parse(parse) => {
                assert!(parse.raw().contains("happy to help"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(generator.locations().is_none());
        assert_eq!(
            generator.overview().unwrap().name.as_deref(),
            Some("The Sunken Reach")
        );
    }

    #[tokio::test]
    async fn test_schema_violation_aborts_merge_atomically() {
        // Second location's encounters list is missing entirely
        let truncated = r#"[
            {"name": "The Drowned Chapel", "encounters": [
                {"name": "Bell Toll", "description": "The bell rings.", "difficulty": "easy"}
            ]},
            {"name": "Beacon Fen"}
        ]"#;
        let mut generator = generator(&[OVERVIEW_REPLY, LOCATIONS_REPLY, truncated]);

        generator.create_overview().await.unwrap();
        generator.create_locations().await.unwrap();
        let err = generator.create_encounters().await.unwrap_err();
        assert!(matches!(err, GenerationError::Schema(_)));
        // No location was populated, not even the well-formed first one
        assert!(generator
            .locations()
            .unwrap()
            .iter()
            .all(|location| !location.has_encounters()));
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_as_error() {
        let mut generator = generator(&[]);
        let err = generator.create_overview().await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
        assert!(generator.overview().is_none());
    }
}
