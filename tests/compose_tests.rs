use chargen::catalog::{Ability, Archetype, Catalog};
use chargen::compose::{compose, AbilityRating, Character, CountWeights, Rng};

fn two_block_catalog() -> Catalog {
    Catalog::parse(
        "Knight\npower level 3\nAbilities Steel 4d\nResources a sword.\n\n\
         Rogue\npower level 2 • requires the Knight\nAbilities Stealth 3d\nResources a dagger.",
    )
    .expect("catalog parses")
}

fn order(name: &str, power_level: i32) -> Archetype {
    Archetype {
        name: name.to_string(),
        power_level,
        is_order: true,
        ..Archetype::default()
    }
}

#[test]
fn knight_and_rogue_compose_into_a_legal_character() {
    let catalog = two_block_catalog();
    let character = compose(&catalog, &["Knight", "Rogue"], &CountWeights::default(), &mut Rng::new(7))
        .expect("composes");

    assert_eq!(character.power_level, 5);
    assert!(character.legal);
    assert_eq!(character.abilities[&Ability::Steel], AbilityRating::Four);
    assert_eq!(character.abilities[&Ability::Stealth], AbilityRating::Three);
    assert_eq!(character.abilities[&Ability::Medicine], AbilityRating::Base);
    assert_eq!(character.resources, vec!["(Knight) a sword", "(Rogue) a dagger"]);
}

#[test]
fn fuzzy_names_resolve_to_catalog_entries() {
    let catalog = two_block_catalog();
    let character = compose(&catalog, &["knigt", "rog"], &CountWeights::default(), &mut Rng::new(7))
        .expect("composes");
    assert_eq!(character.names(), vec!["Knight", "Rogue"]);
}

#[test]
fn ability_merge_does_not_depend_on_order() {
    let catalog = two_block_catalog();
    let ab = compose(&catalog, &["Knight", "Rogue"], &CountWeights::default(), &mut Rng::new(1))
        .expect("composes");
    let ba = compose(&catalog, &["Rogue", "Knight"], &CountWeights::default(), &mut Rng::new(1))
        .expect("composes");
    assert_eq!(ab.abilities, ba.abilities);
    assert_eq!(ab.resources, ba.resources);
}

#[test]
fn two_orders_make_a_character_illegal() {
    let first = order("Templar", 4);
    let second = order("Sea Captain", 3);
    let character = Character::from_archetypes(vec![&first, &second]);
    assert!(!character.legal);
    assert_eq!(character.power_level, 7);
}

#[test]
fn random_characters_respect_count_bounds() {
    let archetypes: Vec<Archetype> = (1..=8)
        .map(|i| Archetype {
            name: format!("Archetype {i}"),
            power_level: i,
            ..Archetype::default()
        })
        .collect();
    let catalog = Catalog::from_archetypes(archetypes);
    let mut rng = Rng::new(99);
    let none: [&str; 0] = [];
    for _ in 0..200 {
        let character = compose(&catalog, &none, &CountWeights::default(), &mut rng).expect("composes");
        assert!((2..=4).contains(&character.archetypes.len()));
        assert!(character.legal);
        let expected: i32 = character.archetypes.iter().map(|a| a.power_level).sum();
        assert_eq!(character.power_level, expected);
    }
}

#[test]
fn character_json_lists_archetype_names() {
    let catalog = two_block_catalog();
    let character = compose(&catalog, &["Knight", "Rogue"], &CountWeights::default(), &mut Rng::new(7))
        .expect("composes");
    let payload = serde_json::to_value(&character).expect("serializes");
    assert_eq!(payload["archetypes"], serde_json::json!(["Knight", "Rogue"]));
    assert_eq!(payload["abilities"]["Steel"], "4d");
    assert_eq!(payload["legal"], true);
}
