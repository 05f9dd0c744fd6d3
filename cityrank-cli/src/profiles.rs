//! Profiles command: list audience profiles with their preset weights.

use std::io::Write;

use cityrank_core::ProfileId;

use crate::CliError;
use crate::rank::write_line;

pub(super) fn write_profiles(writer: &mut dyn Write) -> Result<(), CliError> {
    for id in ProfileId::ALL {
        let profile = id.profile();
        let marker = if id == ProfileId::default() {
            " (default)"
        } else {
            ""
        };
        write_line(writer, &format!("{id}: {}{marker}", profile.label))?;
        for (indicator, weight) in profile.presets {
            write_line(
                writer,
                &format!("  {:<32} {weight:>2}", indicator.as_str()),
            )?;
        }
    }
    Ok(())
}
