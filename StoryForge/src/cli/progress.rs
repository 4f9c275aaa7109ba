//! CLI progress display utilities
//!
//! Step indicators with emojis and a completion line, matching the
//! `[n/total]` style used across the command line.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::HumanDuration;

use crate::convert::{ConversionSummary, ConvertPhase};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Link - for graph linking
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
/// Document - for file output
pub static DOCUMENT: Emoji<'_, '_> = Emoji("📄 ", "");
/// Floppy disk - for database writes
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

/// Print a step indicator: `[1/4] 🔍 Message...`
pub fn print_step(current: usize, total: usize, emoji: &Emoji<'_, '_>, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print the step line for a conversion phase.
pub fn print_phase(phase: ConvertPhase, total: usize) {
    let (index, emoji) = match phase {
        ConvertPhase::ReadingProject => (1, &LOOKING_GLASS),
        ConvertPhase::ResolvingGraph => (2, &LINK),
        ConvertPhase::WritingDocument => (3, &DOCUMENT),
        ConvertPhase::WritingDatabase => (4, &DISK),
    };
    print_step(index, total, emoji, &format!("{}...", phase.description()));
}

/// Print the counts of a finished conversion.
pub fn print_summary(summary: &ConversionSummary) {
    println!("   Project:      {}", style(&summary.project).bold());
    println!("   Images:       {}", summary.images);
    println!("   Entities:     {}", summary.entities);
    println!("   Localization: {}", summary.localization_keys);
    println!("   Dialogues:    {}", summary.dialogues);
    println!(
        "   Fragments:    {} ({} edges, {} speakers inferred)",
        summary.fragments, summary.graph.edges, summary.graph.inferred_speakers
    );
    if summary.graph.unresolved_speakers > 0 {
        println!(
            "   {}",
            style(format!(
                "{} fragments have no speaker",
                summary.graph.unresolved_speakers
            ))
            .yellow()
        );
    }
    if let Some(db) = &summary.database {
        println!(
            "   Database:     {} fragments, {} connections ({} fragments outside known dialogues)",
            db.fragments, db.connections, db.skipped_fragments
        );
    }
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}
