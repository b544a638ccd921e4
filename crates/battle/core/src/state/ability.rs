use std::fmt;

/// Catalog identifier of an ability (e.g. `"basic_attack"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityId(pub String);

impl AbilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AbilityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an ability does when resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EffectType {
    /// Reduces enemy HP.
    Damage,
    /// Restores HP to every living party member.
    Heal,
    /// Raises the caster's attack-buff counter.
    Buff,
    /// Raises the enemy's defense-down counter.
    Debuff,
}

/// Elemental flavour. Carried for presentation and logs only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Element {
    #[default]
    Physical,
    Fire,
    Ice,
    Lightning,
    Holy,
    Shadow,
}

/// An ability an actor can plan during its turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub description: String,
    pub ap_cost: u32,
    pub base_power: u32,
    pub effect: EffectType,
    pub element: Element,
    /// Turns the ability is unavailable after being used.
    pub cooldown: u8,
    /// Owned rank from the player's loadout.
    pub rank: u8,
}

impl Ability {
    pub const BASIC_ATTACK_ID: &'static str = "basic_attack";

    /// Fallback ability every actor can always use.
    pub fn basic_attack() -> Self {
        Self {
            id: AbilityId::new(Self::BASIC_ATTACK_ID),
            name: "Strike".to_owned(),
            description: "A plain weapon strike.".to_owned(),
            ap_cost: 1,
            base_power: 40,
            effect: EffectType::Damage,
            element: Element::Physical,
            cooldown: 0,
            rank: 1,
        }
    }

    pub fn is_basic_attack(&self) -> bool {
        self.id.as_str() == Self::BASIC_ATTACK_ID
    }
}
