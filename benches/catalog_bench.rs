//! Catalog parsing and character composition throughput.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chargen::catalog::{Catalog, TechniqueCatalog, DEFAULT_CATALOG_PATH};
use chargen::compose::{compose, CountWeights, Rng};
use chargen::render::{render_character, DiceStyle};

const FALLBACK_CATALOG: &str = "The Knight\npower level 3\nAbilities Steel 4d, Prowess 3d\nTraining Choose one.\nLance\nShield\nResources a sword.\n\n\
The Rogue\npower level 2\nAbilities Stealth 3d, possibly Steel 3d\nTraits Quick\nResources a dagger.\n\n\
The Courtier\npower level 2\nAbilities Influence 4d\nBond Relationship a patron\n\n\
The Templar\npower level 4 • exemplar order • requires the Knight\nAbilities Medicine 3d, Steel 3d or 4d";

fn catalog_text() -> String {
    std::fs::read_to_string(DEFAULT_CATALOG_PATH).unwrap_or_else(|_| FALLBACK_CATALOG.to_string())
}

fn bench_catalog(c: &mut Criterion) {
    let text = catalog_text();
    let catalog = Catalog::parse(&text).expect("bench catalog parses");
    let techniques = TechniqueCatalog::default();
    let weights = CountWeights::default();

    let mut group = c.benchmark_group("catalog");
    group.sample_size(100);

    group.bench_function("parse", |b| {
        b.iter(|| Catalog::parse(black_box(&text)).expect("parses"))
    });

    group.bench_function("compose_random", |b| {
        let mut rng = Rng::new(7);
        let names: [&str; 0] = [];
        b.iter(|| {
            let character = compose(&catalog, black_box(&names), &weights, &mut rng).expect("composes");
            black_box(character.power_level)
        })
    });

    group.bench_function("compose_and_render_named", |b| {
        let mut rng = Rng::new(7);
        let names = ["knight", "rogue"];
        b.iter(|| {
            let character = compose(&catalog, black_box(&names), &weights, &mut rng).expect("composes");
            black_box(render_character(&character, &techniques, DiceStyle::Plain))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_catalog);
criterion_main!(benches);
