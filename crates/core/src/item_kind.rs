//! Item classification from the leading integer of a serial.
//!
//! The first block of a serial is an integer identifying the item's
//! manufacturer and type. The mapping is a fixed table.

use std::fmt;

use crate::serial::{Block, Serial};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Manufacturer {
    Jacobs,
    Tediore,
    Torgue,
    Maliwan,
    Daedalus,
    Vladof,
    Order,
    Ripper,
    Cov,
    Hyperion,
    Atlas,
    // Class mods are keyed by character instead of manufacturer
    Vex,
    Amon,
    Rafa,
    Harlowe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Pistol,
    Shotgun,
    Smg,
    Sniper,
    AssaultRifle,
    HeavyWeapon,
    Grenade,
    Shield,
    Repkit,
    ClassMod,
    Enhancer,
}

/// Manufacturer and type of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKind {
    pub manufacturer: Manufacturer,
    pub item_type: ItemType,
}

use ItemType::*;
use Manufacturer::*;

const TABLE: &[(u32, Manufacturer, ItemType)] = &[
    (2, Daedalus, Pistol),
    (3, Jacobs, Pistol),
    (4, Order, Pistol),
    (5, Tediore, Pistol),
    (6, Torgue, Pistol),
    (7, Ripper, Shotgun),
    (8, Daedalus, Shotgun),
    (9, Jacobs, Shotgun),
    (10, Maliwan, Shotgun),
    (11, Tediore, Shotgun),
    (12, Torgue, Shotgun),
    (13, Daedalus, AssaultRifle),
    (14, Tediore, AssaultRifle),
    (15, Order, AssaultRifle),
    (16, Vladof, Sniper),
    (17, Torgue, AssaultRifle),
    (18, Vladof, AssaultRifle),
    (19, Ripper, Smg),
    (20, Daedalus, Smg),
    (21, Maliwan, Smg),
    (22, Vladof, Smg),
    (23, Ripper, Sniper),
    (24, Jacobs, Sniper),
    (25, Maliwan, Sniper),
    (26, Order, Sniper),
    (27, Jacobs, AssaultRifle),
    (254, Vex, ClassMod),
    (255, Amon, ClassMod),
    (256, Rafa, ClassMod),
    (259, Harlowe, ClassMod),
    (261, Torgue, Repkit),
    (263, Maliwan, Grenade),
    (264, Hyperion, Enhancer),
    (267, Jacobs, Grenade),
    (268, Jacobs, Enhancer),
    (270, Daedalus, Grenade),
    (271, Maliwan, Enhancer),
    (272, Order, Grenade),
    (274, Ripper, Repkit),
    (275, Ripper, HeavyWeapon),
    (277, Daedalus, Repkit),
    (279, Maliwan, Shield),
    (281, Order, Enhancer),
    (282, Vladof, HeavyWeapon),
    (283, Vladof, Shield),
    (284, Atlas, Enhancer),
    (285, Order, Repkit),
    (286, Cov, Enhancer),
    (287, Tediore, Shield),
    (289, Maliwan, HeavyWeapon),
    (292, Tediore, Enhancer),
    (293, Order, Shield),
    (296, Ripper, Enhancer),
    (299, Daedalus, Enhancer),
    (300, Ripper, Shield),
    (303, Torgue, Enhancer),
    (306, Jacobs, Shield),
    (310, Vladof, Enhancer),
    (312, Daedalus, Shield),
    (321, Torgue, Shield),
];

impl ItemKind {
    /// Look up the kind for a leading integer.
    pub fn lookup(id: u32) -> Option<Self> {
        TABLE
            .binary_search_by_key(&id, |&(key, _, _)| key)
            .ok()
            .map(|i| Self {
                manufacturer: TABLE[i].1,
                item_type: TABLE[i].2,
            })
    }
}

impl Serial {
    /// Kind of this item, if the first block is a known integer id.
    pub fn item_kind(&self) -> Option<ItemKind> {
        match self.blocks().first()? {
            Block::Integer(id) | Block::BitRun(id) => ItemKind::lookup(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Jacobs => "Jacobs",
            Tediore => "Tediore",
            Torgue => "Torgue",
            Maliwan => "Maliwan",
            Daedalus => "Daedalus",
            Vladof => "Vladof",
            Order => "Order",
            Ripper => "Ripper",
            Cov => "COV",
            Hyperion => "Hyperion",
            Atlas => "Atlas",
            Vex => "Vex",
            Amon => "Amon",
            Rafa => "Rafa",
            Harlowe => "Harlowe",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pistol => "Pistol",
            Shotgun => "Shotgun",
            Smg => "SMG",
            Sniper => "Sniper",
            AssaultRifle => "Assault Rifle",
            HeavyWeapon => "Heavy Weapon",
            Grenade => "Grenade",
            Shield => "Shield",
            Repkit => "Repkit",
            ClassMod => "Class Mod",
            Enhancer => "Enhancer",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.manufacturer, self.item_type)
    }
}
