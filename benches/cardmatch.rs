use cardmatch::boundary::extract;
use cardmatch::{
    compose_training_image, BinaryConfig, BinaryStrategy, Card, Deck, DetectConfig, Detector,
    ExtractConfig, FeatureConfig, FeatureStrategy, MatchConfig, Matcher, NormalizeConfig,
    VerifyConfig,
};
use criterion::{criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use std::hint::black_box;

fn make_face(seed: u32, size: u32) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| {
        let v = (((x / 15) * 13 + (y / 15) * 7 + seed * 29) % 9 * 28) as u8;
        Rgb([v, v, v])
    })
}

fn make_scene() -> RgbImage {
    let mut img = RgbImage::from_pixel(640, 480, Rgb([25, 60, 30]));
    for (x0, y0) in [(40u32, 60u32), (240, 80), (440, 50)] {
        for y in y0..y0 + 250 {
            for x in x0..x0 + 170 {
                img.put_pixel(x, y, Rgb([235, 235, 230]));
            }
        }
    }
    img
}

fn make_deck<S: cardmatch::Strategy>(strategy: &S, len: u32) -> Deck {
    let size = strategy.normalize_config().size;
    let faces: Vec<RgbImage> = (0..len).map(|seed| make_face(seed, size)).collect();
    let training = compose_training_image(&faces).unwrap();
    let cards: Vec<Card> = (0..len)
        .map(|i| Card::from_tokens(&(i % 9 + 2).to_string(), "Hearts").unwrap())
        .collect();
    Deck::from_training_image(cards, &training, strategy).unwrap()
}

fn bench_cardmatch(c: &mut Criterion) {
    let scene = make_scene();
    c.bench_function("extract_boundaries", |b| {
        b.iter(|| {
            let boundaries = extract(black_box(&scene), 3, &ExtractConfig::default()).unwrap();
            black_box(boundaries.len());
        })
    });

    let binary = BinaryStrategy::new(NormalizeConfig::default(), BinaryConfig::default()).unwrap();
    let deck = make_deck(&binary, 13);
    let probe = make_face(5, NormalizeConfig::default().size);
    let matcher = Matcher::new(binary.clone());
    c.bench_function("binary_identify_13", |b| {
        b.iter(|| {
            let id = matcher.identify(black_box(&probe), &deck).unwrap();
            black_box(id);
        })
    });

    #[cfg(feature = "rayon")]
    {
        let par = Matcher::new(binary.clone()).with_config(MatchConfig { parallel: true });
        c.bench_function("binary_identify_13_parallel", |b| {
            b.iter(|| {
                let id = par.identify(black_box(&probe), &deck).unwrap();
                black_box(id);
            })
        });
    }

    let feature = FeatureStrategy::new(
        NormalizeConfig::default(),
        FeatureConfig::default(),
        VerifyConfig::default(),
    )
    .unwrap();
    let feature_deck = make_deck(&feature, 13);
    let feature_matcher = Matcher::new(feature).with_config(MatchConfig::default());
    c.bench_function("feature_identify_13", |b| {
        b.iter(|| {
            let id = feature_matcher.identify(black_box(&probe), &feature_deck).unwrap();
            black_box(id);
        })
    });

    let detector = Detector::new(deck, binary, DetectConfig::default()).unwrap();
    c.bench_function("detect_three_cards", |b| {
        b.iter(|| {
            let detection = detector.detect(black_box(&scene), 3).unwrap();
            black_box(detection.cards().len());
        })
    });
}

criterion_group!(benches, bench_cardmatch);
criterion_main!(benches);
