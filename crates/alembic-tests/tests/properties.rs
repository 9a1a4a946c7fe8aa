//! Property tests across the core and the settings stores.

use proptest::prelude::*;

use alembic_core::fractions::calculate_fractions;
use alembic_core::settings::{SettingsStore, UserId};
use alembic_core::speed::{calculate_speed, calculate_speed_flat};
use alembic_core::strength::{correct_for_temperature, distillate_strength};
use alembic_core::tables::{get_liquid_table, get_vapor_table};
use alembic_store::{JsonFileStore, MemoryStore};
use alembic_tests::helpers::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every in-range temperature interpolates to a value between its
    /// neighbouring table rows.
    #[test]
    fn interpolation_stays_between_neighbours(t in 78.15f64..=100.0) {
        for table in [get_liquid_table(), get_vapor_table()] {
            let y = table.interpolate(t).unwrap();
            let keys = table.keys();
            let hi_idx = keys.iter().position(|&k| k >= t).unwrap().max(1);
            let (y_lo, y_hi) = (table.get(keys[hi_idx - 1]).unwrap(), table.get(keys[hi_idx]).unwrap());
            prop_assert!(y <= y_lo.max(y_hi) + EPS && y >= y_lo.min(y_hi) - EPS);
        }
    }

    /// Hotter vapor never reads as stronger distillate.
    #[test]
    fn strength_decreases_with_vapor_temperature(
        a in 78.15f64..=100.0,
        b in 78.15f64..=100.0,
        distillate in 10.0f64..=30.0,
    ) {
        let (cool, hot) = if a <= b { (a, b) } else { (b, a) };
        let s_cool = distillate_strength(85.0, cool, distillate).unwrap().corrected_pct;
        let s_hot = distillate_strength(85.0, hot, distillate).unwrap().corrected_pct;
        prop_assert!(s_hot <= s_cool + EPS);
    }

    #[test]
    fn correction_at_twenty_is_identity(x in 0.0f64..100.0) {
        prop_assert_eq!(correct_for_temperature(x, 20.0).unwrap(), x);
    }

    /// Cuts scale linearly with the batch volume.
    #[test]
    fn fractions_scale_with_volume(
        volume in 1.0f64..500.0,
        pct in 1.0f64..96.0,
        factor in 1.0f64..4.0,
        seed in any::<u8>(),
    ) {
        let constants = sample_constants(seed);
        let one = calculate_fractions(volume, pct, &constants);
        let scaled = calculate_fractions(volume * factor, pct, &constants);
        prop_assert!(close_to(scaled.body, one.body * factor, 1e-6));
        prop_assert!(close_to(scaled.absolute_alcohol, one.absolute_alcohol * factor, 1e-6));
        prop_assert!(one.heads_by_alcohol <= one.heads_by_volume + EPS);
    }

    /// Maximum rate is always twice the minimum, in either model.
    #[test]
    fn max_rate_doubles_min(cube in 20.0f64..=100.0, volume in 0.0f64..100.0) {
        let (min, max) = calculate_speed(cube, volume).unwrap();
        prop_assert!(close(max, 2.0 * min));
        let (min, max) = calculate_speed_flat(volume).unwrap();
        prop_assert!(min <= max);
    }

    /// The last save for a user wins, in memory and on disk.
    #[test]
    fn last_save_wins(seeds in proptest::collection::vec(any::<u8>(), 1..8), user in any::<i64>()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_data.json");
        let file = JsonFileStore::open(&path);
        let memory = MemoryStore::new();

        for &seed in &seeds {
            file.save(UserId(user), sample_constants(seed)).unwrap();
            memory.save(UserId(user), sample_constants(seed)).unwrap();
        }

        let expected = sample_constants(*seeds.last().unwrap());
        prop_assert_eq!(memory.load(UserId(user)), Some(expected));
        prop_assert_eq!(file.load(UserId(user)), Some(expected));
        prop_assert_eq!(JsonFileStore::open(&path).load(UserId(user)), Some(expected));
    }
}
