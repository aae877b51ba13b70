//! CampaignForge - LLM-driven RPG campaign generation pipeline
//!
//! CampaignForge builds a role-playing-game campaign in dependent stages:
//! - An overview of the region and its driving catastrophe
//! - The important locations of the world
//! - The heroes of the story
//! - Three encounters per location, easy through hard
//! - Candidate actions per encounter, each with success and failure outcomes
//!
//! Each stage threads the prior results back into the conversation as
//! serialized context, asks an OpenAI-compatible chat endpoint for the next
//! layer of content, and recovers typed entities from the reply, tolerant of
//! code fencing and other formatting quirks but strict about schema.

pub mod application;
pub mod domain;
pub mod infrastructure;
