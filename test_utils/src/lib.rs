use ark_bls12_381::Bls12_381;
use ark_ec::pairing::Pairing;
use crowd_notifier::{
    engine::CrowdNotifier,
    store::{InMemoryExposureStore, InMemoryVisitStore},
};

pub type Fr = <Bls12_381 as Pairing>::ScalarField;

pub type Engine = CrowdNotifier<Bls12_381, InMemoryVisitStore, InMemoryExposureStore>;

pub mod fixtures;
#[macro_use]
pub mod serialization;
