// Application layer: runs one desk command against an in-memory agency.

pub mod commands;
