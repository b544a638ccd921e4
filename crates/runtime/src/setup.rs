//! Builds session actors from provider data.
use battle_core::{
    AbilityCatalog, Actor, ActorId, ActorKind, EnemyInfo, Loadout, ResourceMeter,
};
use tracing::warn;

use crate::api::{EnemyDescriptor, IdentitySnapshot, SetupError};

/// The player's actor. `mp`/`max_mp` become the AP pool; the loadout is
/// resolved against `catalog` with the basic attack always first.
pub(crate) fn player_actor(
    identity: &IdentitySnapshot,
    loadout: &Loadout,
    catalog: &AbilityCatalog,
) -> Actor {
    for missing in catalog.missing(loadout) {
        warn!(
            target: "runtime::setup",
            user = %identity.user_id,
            ability = %missing,
            "loadout ability not in catalog, skipping"
        );
    }

    let name = identity
        .name
        .clone()
        .unwrap_or_else(|| identity.user_id.clone());

    Actor::new(
        ActorId::PLAYER,
        name,
        ActorKind::Player,
        ResourceMeter::new(identity.hp, identity.max_hp),
        ResourceMeter::new(identity.mp, identity.max_mp),
    )
    .with_level(identity.level)
    .with_abilities(catalog.resolve_loadout(loadout))
}

pub(crate) fn enemy_actor(descriptor: &EnemyDescriptor) -> Result<(Actor, EnemyInfo), SetupError> {
    if descriptor.max_hp == 0 {
        return Err(SetupError::InvalidEnemy {
            id: descriptor.id.clone(),
            reason: "max hp is zero",
        });
    }

    let actor = Actor::enemy(descriptor.name.clone(), descriptor.hp, descriptor.max_hp)
        .with_level(descriptor.level);
    let info = EnemyInfo {
        id: descriptor.id.clone(),
        name: descriptor.name.clone(),
        icon_url: descriptor.icon_url.clone(),
    };
    Ok((actor, info))
}
