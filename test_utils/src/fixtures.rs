//! Authority, venue and released secrets as the tests and benchmarks need them

use crate::{Engine, Fr};
use ark_bls12_381::Bls12_381;
use ark_std::rand::{CryptoRng, RngCore};
use crowd_notifier::{
    authority::{generate_user_upload_info, ReleasedSecret},
    ibe::{MasterPublicKey, MasterSecretKey},
    payload::AssociatedData,
    scan::MatchConfig,
    store::{InMemoryExposureStore, InMemoryVisitStore},
    venue::VenueToken,
};

// 01.01.2021 10:00:00 UTC
pub const START_OF_TEST_DAY: u64 = 1_609_495_200;

pub struct Authority {
    pub secret_key: MasterSecretKey<Fr>,
    pub public_key: MasterPublicKey<Bls12_381>,
}

impl Authority {
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret_key = MasterSecretKey::new(rng);
        let public_key = MasterPublicKey::new(&secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// A venue token valid forever
    pub fn venue<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        description: &str,
    ) -> VenueToken<Bls12_381> {
        VenueToken::generate(
            rng,
            self.public_key.clone(),
            description,
            "Main street 1",
            0,
            u64::MAX,
            vec![],
        )
        .unwrap()
    }

    /// What the authority publishes after a positive case at `venue` during `[start, end]`
    pub fn release<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        venue: &VenueToken<Bls12_381>,
        start: u64,
        end: u64,
        message: &str,
    ) -> Vec<ReleasedSecret<Bls12_381>> {
        let associated_data = AssociatedData::new(message, vec![]);
        generate_user_upload_info(venue, start, end)
            .unwrap()
            .iter()
            .map(|info| {
                ReleasedSecret::new(rng, &self.secret_key, info, start, end, &associated_data)
                    .unwrap()
            })
            .collect()
    }
}

pub fn new_engine(config: MatchConfig) -> Engine {
    Engine::new(
        InMemoryVisitStore::new(),
        InMemoryExposureStore::new(),
        config,
    )
}
