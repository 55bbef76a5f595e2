// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use tours_app::{TourId, TourRecord};

const DESTINATIONS: [&str; 14] = [
    "Paris",
    "Ireland",
    "Salzburg",
    "Rome",
    "Kyoto",
    "Lisbon",
    "Iceland",
    "Patagonia",
    "Marrakech",
    "Vienna",
    "Crete",
    "the Dolomites",
    "Norway",
    "Tuscany",
];

const STYLES: [&str; 8] = [
    "Best of",
    "Highlights of",
    "Classic",
    "Hidden",
    "Grand Tour of",
    "Slow Travel in",
    "Essential",
    "Taste of",
];

const SENTENCES: [&str; 12] = [
    "Mornings start with a guided walk through the old town before the crowds arrive.",
    "Afternoons are left open for museums, markets, or a long lunch by the water.",
    "Your local guide handles every transfer so you can focus on the view.",
    "Evenings bring small-group dinners at family-run restaurants.",
    "Expect a mix of rail journeys, short coach rides, and easy hikes.",
    "Accommodation is in centrally located boutique hotels.",
    "A free day midway through lets you set your own pace.",
    "Entrance fees for all listed sights are included in the price.",
    "Group size is capped at sixteen travelers.",
    "Optional excursions can be booked once you arrive.",
    "The final night ends with a farewell dinner overlooking the harbor.",
    "Comfortable walking shoes are strongly recommended.",
];

const ID_ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator for tour records shaped like the public tours endpoint.
#[derive(Debug, Clone)]
pub struct TourFaker {
    rng: DeterministicRng,
}

impl TourFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn tour(&mut self) -> TourRecord {
        let id = self.record_id();
        let destination = self.pick(&DESTINATIONS);
        let style = self.pick(&STYLES);
        let days = 3 + self.int_n(12);
        let price = 995 + 100 * self.int_n(60);
        let sentence_count = 1 + self.int_n(5);
        let info = (0..sentence_count)
            .map(|_| self.pick(&SENTENCES))
            .collect::<Vec<&str>>()
            .join(" ");

        TourRecord {
            image: format!("https://images.example.com/tours/{id}.jpeg"),
            id: TourId::new(id),
            name: format!("{style} {destination} in {days} Days Tour"),
            price: price.to_string(),
            info,
        }
    }

    pub fn tours(&mut self, count: usize) -> Vec<TourRecord> {
        (0..count).map(|_| self.tour()).collect()
    }

    fn record_id(&mut self) -> String {
        let mut id = String::from("rec");
        for _ in 0..14 {
            id.push(char::from(ID_ALPHABET[self.int_n(ID_ALPHABET.len())]));
        }
        id
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.int_n(values.len())]
    }
}

/// Fixed catalog used by `--demo` and by tests that need stable text lengths.
/// Tours 1, 2, and 4 have descriptions over the truncation threshold. Prices
/// use comma grouping the way the public endpoint serves them.
pub fn sample_tours() -> Vec<TourRecord> {
    [
        (
            "1",
            "Best of Paris in 7 Days Tour",
            "1,995",
            long_info("Paris", 3),
        ),
        (
            "2",
            "Best of Ireland in 14 Days Tour",
            "3,895",
            long_info("Ireland", 4),
        ),
        (
            "3",
            "Best of Salzburg & Vienna in 8 Days Tour",
            "2,695",
            "Let's go where classical music, towering castles, and the-hills-are-alive scenery welcome you.".to_owned(),
        ),
        (
            "4",
            "Best of Rome in 7 Days Tour",
            "2,095",
            long_info("Rome", 3),
        ),
        (
            "5",
            "Best of Poland in 10 Days Tour",
            "2,595",
            "Small towns, big history, and a slow pace.".to_owned(),
        ),
    ]
    .into_iter()
    .map(|(id, name, price, info)| TourRecord {
        id: TourId::new(id),
        image: format!("https://images.example.com/tours/{id}.jpeg"),
        name: name.to_owned(),
        price: price.to_owned(),
        info,
    })
    .collect()
}

/// A record with the given id and description, filled out with valid fields.
pub fn tour_with_info(id: &str, info: &str) -> TourRecord {
    TourRecord {
        id: TourId::new(id),
        image: format!("https://images.example.com/tours/{id}.jpeg"),
        name: format!("Tour {id}"),
        price: "1995".to_owned(),
        info: info.to_owned(),
    }
}

/// Serializes records the way the endpoint returns them: a JSON array.
pub fn tours_json(tours: &[TourRecord]) -> Result<String> {
    serde_json::to_string(tours).context("encode tours fixture")
}

fn long_info(destination: &str, sentences: usize) -> String {
    let mut info = format!("{destination} rewards travelers who take their time.");
    for sentence in SENTENCES.iter().take(sentences) {
        info.push(' ');
        info.push_str(sentence);
    }
    info
}

#[cfg(test)]
mod tests {
    use super::{TourFaker, sample_tours, tour_with_info, tours_json};
    use std::collections::BTreeSet;
    use tours_app::{needs_truncation, validate_unique_ids};

    #[test]
    fn same_seed_same_tours() {
        let first = TourFaker::new(7).tours(5);
        let second = TourFaker::new(7).tours(5);
        assert_eq!(first, second);
    }

    #[test]
    fn generated_tours_validate() {
        let mut faker = TourFaker::new(3);
        for tour in faker.tours(50) {
            tour.validate().expect("generated tour should validate");
        }
    }

    #[test]
    fn generated_ids_look_like_record_ids() {
        let mut faker = TourFaker::new(11);
        let tour = faker.tour();
        assert!(tour.id.as_str().starts_with("rec"));
        assert_eq!(tour.id.as_str().len(), 17);
    }

    #[test]
    fn variety_across_seeds() {
        let mut names = BTreeSet::new();
        for seed in 0_u64..20_u64 {
            names.insert(TourFaker::new(seed).tour().name);
        }
        assert!(names.len() >= 10, "got {}", names.len());
    }

    #[test]
    fn generated_info_crosses_threshold_both_ways() {
        let tours = TourFaker::new(5).tours(60);
        assert!(tours.iter().any(|tour| needs_truncation(&tour.info)));
        assert!(tours.iter().any(|tour| !needs_truncation(&tour.info)));
    }

    #[test]
    fn sample_catalog_is_valid_and_mixed() {
        let tours = sample_tours();
        assert_eq!(tours.len(), 5);
        validate_unique_ids(&tours).expect("sample ids should be unique");
        for tour in &tours {
            tour.validate().expect("sample tour should validate");
        }
        let long = tours
            .iter()
            .filter(|tour| needs_truncation(&tour.info))
            .map(|tour| tour.id.as_str())
            .collect::<Vec<&str>>();
        assert_eq!(long, vec!["1", "2", "4"]);
        assert_eq!(tours[0].price, "1,995");
    }

    #[test]
    fn fixture_json_is_an_array_of_string_fields() {
        let json = tours_json(&[tour_with_info("1", "hello")]).expect("encode");
        assert!(json.starts_with('['));
        assert!(json.contains(r#""id":"1""#));
        assert!(json.contains(r#""price":"1995""#));
    }

    #[test]
    fn int_n() {
        let mut faker = TourFaker::new(42);
        for _ in 0..100 {
            assert!(faker.int_n(5) < 5);
        }
    }
}
