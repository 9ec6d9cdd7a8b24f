//! Proptest generators for property-based testing.

use proptest::prelude::*;

use star_registry_core::{Block, BlockBody, Keypair, StarInput, StarRecord};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a hex address.
pub fn address() -> impl Strategy<Value = String> {
    keypair().prop_map(|kp| kp.address().to_hex())
}

/// Right ascension in `"<h>h <m>m <s>s"` form.
pub fn right_ascension() -> impl Strategy<Value = String> {
    (0u8..24, 0u8..60, 0u8..60, 0u8..10)
        .prop_map(|(h, m, s, t)| format!("{}h {}m {}.{}s", h, m, s, t))
}

/// Declination in `"<d>° <m>' <s>"` form.
pub fn declination() -> impl Strategy<Value = String> {
    (-89i8..=89, 0u8..60, 0u8..60).prop_map(|(d, m, s)| format!("{}° {}' {}", d, m, s))
}

/// A non-empty story of at most `max_len` characters.
pub fn story(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 1..=max_len.max(1))
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generate a star as submitted.
pub fn star_input() -> impl Strategy<Value = StarInput> {
    (
        right_ascension(),
        declination(),
        proptest::option::of("[0-9]\\.[0-9]{2}"),
        proptest::option::of("[A-Z][a-z]{2,12}"),
        story(120),
    )
        .prop_map(|(ra, dec, mag, con, story)| StarInput {
            ra,
            dec,
            mag,
            con,
            story,
        })
}

/// Parameters for generating a block.
#[derive(Debug, Clone)]
pub struct BlockParams {
    pub height: u64,
    pub time: u64,
    pub previous_block_hash: String,
    pub address: String,
    pub star: StarInput,
}

impl Arbitrary for BlockParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            1u64..=100_000,
            0u64..=4_000_000_000,
            any::<[u8; 32]>(),
            address(),
            star_input(),
        )
            .prop_map(|(height, time, prev, address, star)| BlockParams {
                height,
                time,
                previous_block_hash: prev.iter().map(|b| format!("{:02x}", b)).collect(),
                address,
                star,
            })
            .boxed()
    }
}

/// Build a block from parameters.
pub fn block_from_params(params: &BlockParams) -> Block {
    let mut star = StarRecord::new(&*params.star.ra, &*params.star.dec, &params.star.story);
    star.magnitude = params.star.mag.clone();
    star.constellation = params.star.con.clone();
    Block::new(
        params.height,
        params.time,
        params.previous_block_hash.clone(),
        BlockBody::new(params.address.clone(), star),
    )
}
