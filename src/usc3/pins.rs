//! Bit packing for pin-oriented commands.
//!
//! Output pins (1-based bit values, used by `OOF` and `LPJ`):
//!
//! | Bit   | Output        | Notes                          |
//! |-------|---------------|--------------------------------|
//! | 1     | OptoOut_0     | reserved for "marking active"  |
//! | 2     | OptoOut_1     |                                |
//! | 3     | OptoOut_2     | red pointer, when active       |
//! | 4-6   | OptoOut_3..5  |                                |
//! | 7-16  | DigiOut_0..9  |                                |
//! | 17-22 | SmOut_0..5    | stepper outputs                |
//!
//! Input pins usable by the laser-disable flag (`FLAGS`):
//! 2..=5 are OptoIn_2..5, 6..=15 are DigiIn_0..9. The trigger mode is
//! added on top (0x00 level, 0x10 edge), so pins must stay below 16.

use std::ops::RangeInclusive;

use crate::domain::{TriggerMode, Usc3Error, Usc3Result};

/// Output pin bit values accepted by the controller
pub const OUTPUT_PINS: RangeInclusive<u8> = 1..=22;

/// Input pins that can disable the laser
pub const DISABLE_INPUT_PINS: RangeInclusive<u8> = 2..=15;

/// Sum `2^(pin-1)` over `pins`.
///
/// Pins are not de-duplicated: passing the same pin twice adds its bit
/// twice and yields a different mask.
pub fn output_mask(pins: &[u8]) -> Usc3Result<u32> {
    pins.iter().try_fold(0u32, |mask, &pin| {
        if !OUTPUT_PINS.contains(&pin) {
            return Err(Usc3Error::InvalidParameter(format!(
                "Output pin {pin} outside {}..={}",
                OUTPUT_PINS.start(),
                OUTPUT_PINS.end()
            )));
        }
        mask.checked_add(1u32 << (pin - 1)).ok_or_else(|| {
            Usc3Error::InvalidParameter(format!(
                "Output mask overflows u32 ({} pins given)",
                pins.len()
            ))
        })
    })
}

/// Build the `FLAGS` word: `pin + trigger_mode`.
pub fn disable_flag(input_pin: u8, trigger_mode: TriggerMode) -> Usc3Result<u32> {
    if !DISABLE_INPUT_PINS.contains(&input_pin) {
        return Err(Usc3Error::InvalidParameter(format!(
            "Disable input pin {input_pin} outside {}..={}",
            DISABLE_INPUT_PINS.start(),
            DISABLE_INPUT_PINS.end()
        )));
    }
    Ok(u32::from(input_pin) + trigger_mode.bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_of_pins_one_and_three() {
        assert_eq!(output_mask(&[1, 3]).unwrap(), 5);
    }

    #[test]
    fn mask_of_empty_set_is_zero() {
        assert_eq!(output_mask(&[]).unwrap(), 0);
    }

    #[test]
    fn mask_of_each_single_pin_is_its_bit() {
        for pin in OUTPUT_PINS {
            assert_eq!(output_mask(&[pin]).unwrap(), 1 << (pin - 1));
        }
    }

    #[test]
    fn mask_of_all_pins() {
        let all: Vec<u8> = OUTPUT_PINS.collect();
        assert_eq!(output_mask(&all).unwrap(), (1 << 22) - 1);
    }

    #[test]
    fn duplicate_pins_double_count() {
        assert_eq!(output_mask(&[2, 2]).unwrap(), 4);
    }

    #[test]
    fn oversized_multiset_is_rejected() {
        // 2047 copies of pin 22 still fit; the 2048th carries past bit 31
        assert_eq!(output_mask(&vec![22u8; 2047]).unwrap(), 2047 << 21);
        let err = output_mask(&vec![22u8; 2048]).unwrap_err();
        assert!(matches!(err, Usc3Error::InvalidParameter(_)), "{err}");
    }

    #[test]
    fn mask_rejects_out_of_range_pins() {
        assert!(output_mask(&[0]).is_err());
        assert!(output_mask(&[1, 23]).is_err());
    }

    #[test]
    fn disable_flag_is_additive() {
        assert_eq!(disable_flag(6, TriggerMode::Edge).unwrap(), 22);
        assert_eq!(disable_flag(6, TriggerMode::Level).unwrap(), 6);
        for pin in DISABLE_INPUT_PINS {
            assert_eq!(disable_flag(pin, TriggerMode::Edge).unwrap(), u32::from(pin) + 0x10);
        }
    }

    #[test]
    fn disable_flag_rejects_pins_that_would_hit_mode_bit() {
        assert!(disable_flag(16, TriggerMode::Level).is_err());
        assert!(disable_flag(1, TriggerMode::Edge).is_err());
        assert!(disable_flag(0, TriggerMode::Level).is_err());
    }
}
