use cardmatch::boundary::extract;
use cardmatch::frame::rotate_half_turn;
use cardmatch::{
    compose_training_image, parse_deck_list, BinaryConfig, BinaryStrategy, Deck, DetectConfig,
    Detection, Detector, FeatureConfig, FeatureStrategy, Matcher, NormalizeConfig, QuadRecoverer,
    Strategy, VerifyConfig,
};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TABLE: Rgb<u8> = Rgb([25, 60, 30]);
const PAPER: Rgb<u8> = Rgb([235, 235, 230]);
const INK: Rgb<u8> = Rgb([30, 30, 40]);

fn fill(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.put_pixel(x, y, color);
        }
    }
}

/// A portrait card with an asymmetric print.
fn draw_marked_card(img: &mut RgbImage, x0: u32, y0: u32) {
    fill(img, x0, y0, 120, 170, PAPER);
    fill(img, x0 + 16, y0 + 16, 30, 40, INK);
    fill(img, x0 + 20, y0 + 120, 80, 14, INK);
}

/// A portrait card covered with a random grey checkerboard.
fn draw_textured_card(img: &mut RgbImage, x0: u32, y0: u32, seed: u64) {
    fill(img, x0, y0, 120, 170, PAPER);
    let mut rng = StdRng::seed_from_u64(seed);
    for cy in 0..11 {
        for cx in 0..7 {
            let v: u8 = rng.random_range(0..=255);
            fill(img, x0 + 18 + cx * 12, y0 + 18 + cy * 12, 12, 12, Rgb([v, v, v]));
        }
    }
}

fn table(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, TABLE)
}

fn binary_strategy(size: u32) -> BinaryStrategy {
    BinaryStrategy::new(
        NormalizeConfig {
            size,
            ..NormalizeConfig::default()
        },
        BinaryConfig::default(),
    )
    .unwrap()
}

/// Warps the largest region of `scene` the way a detection pass does.
fn warp_largest<S: Strategy>(scene: &RgbImage, strategy: &S) -> RgbImage {
    let cfg = DetectConfig::default();
    let boundaries = extract(scene, 1, &cfg.extract).unwrap();
    let quad = cfg.quad.recover(&boundaries[0]).unwrap();
    cardmatch::warp_card(scene, &quad, strategy.normalize_config()).unwrap()
}

fn two_card_deck<S: Strategy>(strategy: &S, card: &RgbImage) -> Deck {
    let size = strategy.normalize_config().size;
    let blank = RgbImage::from_pixel(size, size, PAPER);
    let training = compose_training_image(&[blank, card.clone()]).unwrap();
    let cards = parse_deck_list("2 Clubs\n7 Hearts\n").unwrap();
    Deck::from_training_image(cards, &training, strategy).unwrap()
}

#[test]
fn binary_strategy_identifies_exact_card() {
    let mut scene = table(320, 260);
    draw_marked_card(&mut scene, 80, 40);

    let strategy = binary_strategy(150);
    let warped = warp_largest(&scene, &strategy);
    assert_eq!(warped.dimensions(), (150, 150));
    let deck = two_card_deck(&strategy, &warped);

    let detector = Detector::new(deck, strategy, DetectConfig::default()).unwrap();
    let detection = detector.detect(&scene, 1).unwrap();
    let cards = detection.cards();
    assert_eq!(cards.len(), 1);
    let matched = cards[0].matched.as_ref().unwrap();
    assert_eq!(matched.index, 1);
    assert_eq!(matched.score, 0);
    assert!(!matched.flipped);
    assert_eq!(matched.card.to_string(), "7 Hearts");
}

#[test]
fn half_turned_scene_still_identifies() {
    let mut scene = table(320, 260);
    draw_marked_card(&mut scene, 80, 40);

    let strategy = binary_strategy(150);
    let warped = warp_largest(&scene, &strategy);
    let deck = two_card_deck(&strategy, &warped);
    let detector = Detector::new(deck, strategy, DetectConfig::default()).unwrap();

    let turned = rotate_half_turn(&scene);
    let detection = detector.detect(&turned, 1).unwrap();
    let hand = detection.hand();
    assert_eq!(hand.len(), 1);
    assert_eq!(hand[0].symbol(), "7");
    assert_eq!(hand[0].suit(), "Hearts");
}

#[test]
fn matcher_picks_the_better_orientation() {
    let mut scene = table(320, 260);
    draw_marked_card(&mut scene, 80, 40);

    let strategy = binary_strategy(150);
    let warped = warp_largest(&scene, &strategy);
    let deck = two_card_deck(&strategy, &warped);
    let matcher = Matcher::new(strategy);

    let upright = matcher.identify(&warped, &deck).unwrap().unwrap();
    assert_eq!((upright.index, upright.score, upright.flipped), (1, 0, false));

    let turned = matcher
        .identify(&rotate_half_turn(&warped), &deck)
        .unwrap()
        .unwrap();
    assert_eq!((turned.index, turned.score, turned.flipped), (1, 0, true));
}

#[test]
fn too_few_regions_is_insufficient() {
    let mut scene = table(360, 240);
    draw_marked_card(&mut scene, 20, 30);
    draw_marked_card(&mut scene, 200, 40);

    let cfg = DetectConfig::default();
    let boundaries = extract(&scene, 4, &cfg.extract).unwrap();
    assert_eq!(boundaries.len(), 2);

    let strategy = binary_strategy(150);
    let deck = two_card_deck(&strategy, &RgbImage::from_pixel(150, 150, INK));
    let detector = Detector::new(deck, strategy, cfg).unwrap();
    let detection = detector.detect(&scene, 4).unwrap();
    assert!(detection.is_insufficient());
    assert!(matches!(
        detection,
        Detection::Insufficient {
            found: 2,
            expected: 4
        }
    ));
    assert!(detection.hand().is_empty());
}

#[test]
fn two_cards_are_reported_largest_first() {
    let mut scene = table(360, 240);
    draw_marked_card(&mut scene, 20, 30);
    fill(&mut scene, 200, 60, 100, 140, PAPER);

    let strategy = binary_strategy(150);
    let warped = warp_largest(&scene, &strategy);
    let deck = two_card_deck(&strategy, &warped);
    let detector = Detector::new(deck, strategy, DetectConfig::default()).unwrap();
    let detection = detector.detect(&scene, 2).unwrap();
    let cards = detection.cards();
    assert_eq!(cards.len(), 2);
    assert!(cards[0].quad.area() > cards[1].quad.area());
    assert_eq!(cards[0].matched.as_ref().unwrap().index, 1);
}

#[test]
fn feature_strategy_identifies_textured_card() {
    let mut scene = table(320, 260);
    draw_textured_card(&mut scene, 90, 45, 3);

    let strategy = FeatureStrategy::new(
        NormalizeConfig {
            size: 200,
            ..NormalizeConfig::default()
        },
        FeatureConfig::default(),
        VerifyConfig::default(),
    )
    .unwrap();
    let warped = warp_largest(&scene, &strategy);
    let deck = two_card_deck(&strategy, &warped);
    let detector = Detector::new(deck, strategy, DetectConfig::default()).unwrap();

    let detection = detector.detect(&scene, 1).unwrap();
    let matched = detection.cards()[0].matched.as_ref().unwrap();
    assert_eq!(matched.index, 1);
    assert!(matched.score >= 4, "score {}", matched.score);
}

#[test]
fn feature_strategy_reports_no_confident_match() {
    let strategy = FeatureStrategy::new(
        NormalizeConfig {
            size: 120,
            ..NormalizeConfig::default()
        },
        FeatureConfig::default(),
        VerifyConfig::default(),
    )
    .unwrap();
    let blank = RgbImage::from_pixel(120, 120, PAPER);
    let deck = two_card_deck(&strategy, &blank);
    let matcher = Matcher::new(strategy);
    assert_eq!(matcher.identify(&blank, &deck).unwrap(), None);
}

#[test]
fn empty_frame_is_rejected() {
    let strategy = binary_strategy(60);
    let deck = two_card_deck(&strategy, &RgbImage::from_pixel(60, 60, INK));
    let detector = Detector::new(deck, strategy, DetectConfig::default()).unwrap();
    assert!(detector.detect(&RgbImage::new(0, 0), 1).is_err());
}
