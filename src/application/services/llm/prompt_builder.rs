//! Prompt building functions for the generation stages
//!
//! Each stage gets the ordered message sequence the model needs for
//! continuity: the original stage-setting instruction, prior-stage results
//! replayed as assistant turns, and the new instruction. Prior results are
//! projected down to their context keys before being re-embedded, then
//! encoded as compact JSON.

use serde_json::Value;

use crate::application::ports::outbound::ChatMessage;
use crate::domain::entities::{Character, Encounter, Location, Overview};
use crate::domain::projection::{project, project_all};

/// Format name used when instructing the model how to shape its reply
const RESPONSE_FORMAT: &str = "JSON";

/// Replay a structural value as a prior assistant turn.
fn assistant_context(value: &Value) -> Result<ChatMessage, serde_json::Error> {
    Ok(ChatMessage::assistant(serde_json::to_string(value)?))
}

fn overview_context(overview: &Overview) -> Result<ChatMessage, serde_json::Error> {
    assistant_context(&project(overview, Overview::CONTEXT_KEYS)?)
}

/// The opening instruction that sets the stage for the whole campaign.
fn set_the_stage(theme: &str) -> ChatMessage {
    ChatMessage::user(format!(
        "Set the stage for a {theme} themed role playing game. \
         Describe the region that this takes place in, make sure there's some \
         driving catastrophe that will inspire our heroes to rise to the \
         challenge, and finish by providing some hope that our heroes can chase. \
         Be brief, limit your response to just a single paragraph of 3 sentences. \
         Format your response as a {RESPONSE_FORMAT} object with attributes for \
         the region's \"name\" and the \"description\" requested above."
    ))
}

fn request_characters(character_count: usize) -> ChatMessage {
    let plural = if character_count > 1 { "es" } else { "" };
    ChatMessage::user(format!(
        "Please list the {character_count} hero{plural} of this story. \
         Give each of them a \"name\" and a \"title\", a single word describing them. \
         Give a one sentence \"description\" which details their appearance and skills. \
         Also give a one sentence \"backstory\" which introduces some event in the \
         character's past or a core belief that they are challenged and shaped by, \
         but yet to be resolved. \
         Give each a \"strength\" and \"weakness\", selected from the following \
         options in roughly equal amounts: \"mental\", \"physical\", \"emotional\", \
         or null. \
         Format your response as a list of {RESPONSE_FORMAT} objects."
    ))
}

fn request_locations(location_count: usize) -> ChatMessage {
    ChatMessage::user(format!(
        "Please name and give a one sentence description of {location_count} \
         important locations in this world. \
         Format your response as a list of {RESPONSE_FORMAT} objects, with \
         \"name\" and \"description\" attributes."
    ))
}

fn request_encounters() -> ChatMessage {
    ChatMessage::user(format!(
        "For each of the above locations, describe three problematic encounters \
         that the heroes will have to overcome when they visit that location. \
         The first encounter should be \"easy\", the next \"medium\" and the last \
         \"hard\". \
         Give each encounter a one or two word name. Also give each a two sentence \
         description addressed to the heroes detailing the problem at hand, and be \
         sure to speak in the second person. Just describe the problem, not the \
         solution. \
         Format your response as a nested list of {RESPONSE_FORMAT} objects, with \
         top level objects for each location with a \"name\" attribute, and an \
         \"encounters\" attribute containing a list of encounter objects. Each has \
         a \"name\", \"description\" and \"difficulty\" attribute. The \
         \"difficulty\" attribute should be one of \"easy\", \"medium\" or \"hard\"."
    ))
}

fn request_actions() -> ChatMessage {
    ChatMessage::user(format!(
        "For the encounter above, outline three diverse potential actions that \
         the heroes might try to take in order to overcome the challenge. Just \
         describe the intended action, not the outcome. Use a single sentence for \
         each, and be sure to speak in the imperative plural second person. \
         Label each action with the given \"attribute\" that best matches it, \
         which can be \"emotional\", \"physical\" or \"mental\". Don't explicitly \
         call out this attribute in the descriptions. \
         Please also rate each action's \"difficulty\" based on its likelihood of \
         working in the given encounter. Difficulty can be \"easy\", \"medium\" or \
         \"hard\". \
         Try to make all the attributes and difficulties for each action different \
         from one another. \
         For each action, spend two sentences describing two possible outcomes of \
         that action, one where the heroes are successful and another where they \
         fail. The outcomes should neatly conclude the narrative that began in the \
         encounter's description. \
         Format your response as a list of {RESPONSE_FORMAT} objects with \
         \"description\", \"attribute\", \"difficulty\", \"success\" and \
         \"failure\" attributes."
    ))
}

fn request_level_up() -> ChatMessage {
    ChatMessage::user(format!(
        "This character is now suddenly faced with an event relevant to their \
         backstory, where they are presented with an important choice that \
         changes the way they perceive their past, but still leaves them room \
         to grow. Write a 3 sentence \"description\" of how this event arises, \
         spoken in the second person, and do not elaborate on how the hero \
         responds to the event here. When referring to important people or \
         places, give them specific names. \
         Give this event a two word \"name\". \
         Also create a list of three \"choices\" that they can make in response \
         to the event. \
         Each choice will channel a specific \"attribute\", either \"mental\", \
         \"physical\" or \"emotional\", which shapes the choice. \
         Give each choice a \"description\", a single sentence spoken in the \
         imperative second person which describes a potential choice for the \
         hero, but does not describe how it resolves here. \
         For each choice, provide a two sentence \"outcome\" which details how \
         the hero's choice plays out and reshapes their perception of their \
         backstory. \
         Format your response as a {RESPONSE_FORMAT} object with \"name\", \
         \"description\" and \"choices\" attributes."
    ))
}

/// Messages for the overview stage. No prior context exists yet.
pub fn overview_messages(theme: &str) -> Vec<ChatMessage> {
    vec![set_the_stage(theme)]
}

/// Messages for the characters stage: stage-setting, the overview, and the
/// hero request.
pub fn character_messages(
    theme: &str,
    overview: &Overview,
    character_count: usize,
) -> Result<Vec<ChatMessage>, serde_json::Error> {
    Ok(vec![
        set_the_stage(theme),
        overview_context(overview)?,
        request_characters(character_count),
    ])
}

/// Messages for a character's level-up event. The hero is replayed as if
/// the model had just introduced them on their own.
pub fn level_up_messages(
    theme: &str,
    overview: &Overview,
    character: &Character,
) -> Result<Vec<ChatMessage>, serde_json::Error> {
    Ok(vec![
        set_the_stage(theme),
        overview_context(overview)?,
        request_characters(1),
        assistant_context(&project(character, Character::CONTEXT_KEYS)?)?,
        request_level_up(),
    ])
}

/// Messages for the locations stage.
pub fn location_messages(
    theme: &str,
    overview: &Overview,
    location_count: usize,
) -> Result<Vec<ChatMessage>, serde_json::Error> {
    Ok(vec![
        set_the_stage(theme),
        overview_context(overview)?,
        request_locations(location_count),
    ])
}

/// Messages for the batched encounters stage. The locations are replayed as
/// if the model had just produced them, stripped to name and description.
pub fn encounter_messages(
    theme: &str,
    overview: &Overview,
    locations: &[Location],
) -> Result<Vec<ChatMessage>, serde_json::Error> {
    Ok(vec![
        set_the_stage(theme),
        overview_context(overview)?,
        request_locations(locations.len()),
        assistant_context(&project_all(locations, Location::CONTEXT_KEYS)?)?,
        request_encounters(),
    ])
}

/// Messages for the actions stage, scoped to one encounter at one location.
///
/// The conversation is reconstructed as a coherent exchange: one location,
/// one encounter at it, then the request for candidate actions.
pub fn action_messages(
    theme: &str,
    overview: &Overview,
    location: &Location,
    encounter: &Encounter,
) -> Result<Vec<ChatMessage>, serde_json::Error> {
    Ok(vec![
        set_the_stage(theme),
        overview_context(overview)?,
        request_locations(1),
        assistant_context(&project_all(
            std::slice::from_ref(location),
            Location::CONTEXT_KEYS,
        )?)?,
        ChatMessage::user(format!(
            "Describe an encounter at this location, formatted as {RESPONSE_FORMAT}."
        )),
        assistant_context(&project(encounter, Encounter::CONTEXT_KEYS)?)?,
        request_actions(),
    ])
}
