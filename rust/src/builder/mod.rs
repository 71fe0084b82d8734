//! Tournament construction from preset templates.

mod core;
mod templates;

pub use core::{
    backfill_stage_start_times, build_tournament, create_fields, create_games, BuildError,
    TournamentStructureBuilder, FIELD_COLORS,
};
pub use templates::{
    find_template, templates, FieldAssignment, TemplateStage, TournamentTemplate,
};
