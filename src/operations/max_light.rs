use crate::core::error::{GuardianResult, InputError};
use crate::items::types::{Account, ClassType};
use crate::loadout::orchestrator::{Orchestrator, RealizationReport};
use crate::loadout::selector::find_max_light_loadout;
use crate::remote::retry::RetryPolicy;
use crate::remote::service::InventoryService;
use tracing::{info, instrument};

/// Equips the highest-power gear the account owns on one character.
///
/// The destination is the first character of `class`, or the most recently
/// played character when no class is given.
#[instrument(skip(service, policy, account))]
pub fn equip_max_light<S: InventoryService + ?Sized>(
    service: &S,
    policy: &RetryPolicy,
    account: &Account,
    class: Option<ClassType>,
) -> GuardianResult<RealizationReport> {
    let profile = service.fetch_profile(account)?;
    let destination = match class {
        Some(class) => profile.character_for_class(class)?,
        None => profile.most_recent_character().ok_or(InputError::NoCharacters)?,
    };
    let destination_id = destination.character_id.as_str();

    let loadout = find_max_light_loadout(&profile, destination_id)?;
    info!(
        destination = destination_id,
        class = %destination.class_type,
        projected = loadout.power_level(),
        "max light loadout selected"
    );

    let report = Orchestrator::new(service, *policy).realize(&profile, &loadout, destination_id)?;
    Ok(report)
}
