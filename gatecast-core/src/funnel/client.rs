use gatecast_model::ClientId;
use rand::Rng;

use crate::error::Result;

/// A stand-in visitor identifier shaped like a LAN address.
///
/// Access blocks are keyed by it; it is not a real address and not a
/// security boundary.
pub fn simulated_client_id() -> Result<ClientId> {
    simulated_client_id_with(&mut rand::rng())
}

pub fn simulated_client_id_with(rng: &mut impl Rng) -> Result<ClientId> {
    let host: u8 = rng.random_range(0..255);
    Ok(ClientId::new(format!("192.168.1.{host}"))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn ids_stay_in_the_simulated_subnet() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let id = simulated_client_id_with(&mut rng).unwrap();
            let host: u8 = id
                .as_str()
                .strip_prefix("192.168.1.")
                .unwrap()
                .parse()
                .unwrap();
            assert!(host < 255);
        }
    }
}
