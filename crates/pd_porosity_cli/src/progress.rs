use pd_porosity::prelude::*;

/// Console line for a pipeline stage, or `None` for events the CLI does not report.
pub fn progress_line(event: &PreDamageEvent) -> Option<String> {
    match event {
        PreDamageEvent::LatticeBuilt {
            nx,
            ny,
            particle_count,
        } => Some(format!(
            "Building grid: Nx = {nx}, Ny = {ny}, total particles N = {particle_count}"
        )),
        PreDamageEvent::BondsFound {
            horizon,
            total_bonds,
        } => Some(format!(
            "Computing neighbors: horizon = {horizon:.6}, bonds = {total_bonds}"
        )),
        PreDamageEvent::BondsBroken { broken_bonds, .. } => Some(format!(
            "Applying pre-damage (uniform porosity): {broken_bonds} bonds broken"
        )),
        PreDamageEvent::Warning { context, message } => {
            Some(format!("Warning [{context}]: {message}"))
        }
        _ => None,
    }
}
