//! Named [`ControlNumber`] constants for the controllers assigned by the MIDI specification.
//! Coarse (MSB) controllers carry their plain name; the fine (LSB) counterparts at an offset of
//! 32 carry an `_LSB` suffix. Numbers 120 and above are the channel mode messages, which travel
//! under the same status byte as control changes.

use crate::core::ControlNumber;

pub const BANK_SELECT: ControlNumber = ControlNumber::new(0);
pub const MODULATION: ControlNumber = ControlNumber::new(1);
pub const BREATH: ControlNumber = ControlNumber::new(2);
pub const FOOT: ControlNumber = ControlNumber::new(4);
pub const PORTAMENTO_TIME: ControlNumber = ControlNumber::new(5);
pub const DATA_ENTRY: ControlNumber = ControlNumber::new(6);
pub const VOLUME: ControlNumber = ControlNumber::new(7);
pub const BALANCE: ControlNumber = ControlNumber::new(8);
pub const PAN: ControlNumber = ControlNumber::new(10);
pub const EXPRESSION: ControlNumber = ControlNumber::new(11);
pub const EFFECT_CONTROL_1: ControlNumber = ControlNumber::new(12);
pub const EFFECT_CONTROL_2: ControlNumber = ControlNumber::new(13);
pub const GENERAL_PURPOSE_1: ControlNumber = ControlNumber::new(16);
pub const GENERAL_PURPOSE_2: ControlNumber = ControlNumber::new(17);
pub const GENERAL_PURPOSE_3: ControlNumber = ControlNumber::new(18);
pub const GENERAL_PURPOSE_4: ControlNumber = ControlNumber::new(19);

pub const BANK_SELECT_LSB: ControlNumber = ControlNumber::new(32);
pub const MODULATION_LSB: ControlNumber = ControlNumber::new(33);
pub const BREATH_LSB: ControlNumber = ControlNumber::new(34);
pub const FOOT_LSB: ControlNumber = ControlNumber::new(36);
pub const PORTAMENTO_TIME_LSB: ControlNumber = ControlNumber::new(37);
pub const DATA_ENTRY_LSB: ControlNumber = ControlNumber::new(38);
pub const VOLUME_LSB: ControlNumber = ControlNumber::new(39);
pub const BALANCE_LSB: ControlNumber = ControlNumber::new(40);
pub const PAN_LSB: ControlNumber = ControlNumber::new(42);
pub const EXPRESSION_LSB: ControlNumber = ControlNumber::new(43);
pub const EFFECT_CONTROL_1_LSB: ControlNumber = ControlNumber::new(44);
pub const EFFECT_CONTROL_2_LSB: ControlNumber = ControlNumber::new(45);
pub const GENERAL_PURPOSE_1_LSB: ControlNumber = ControlNumber::new(48);
pub const GENERAL_PURPOSE_2_LSB: ControlNumber = ControlNumber::new(49);
pub const GENERAL_PURPOSE_3_LSB: ControlNumber = ControlNumber::new(50);
pub const GENERAL_PURPOSE_4_LSB: ControlNumber = ControlNumber::new(51);

pub const SUSTAIN_PEDAL: ControlNumber = ControlNumber::new(64);
pub const PORTAMENTO_SWITCH: ControlNumber = ControlNumber::new(65);
pub const SOSTENUTO_SWITCH: ControlNumber = ControlNumber::new(66);
pub const SOFT_PEDAL: ControlNumber = ControlNumber::new(67);
pub const LEGATO_SWITCH: ControlNumber = ControlNumber::new(68);
pub const HOLD_2: ControlNumber = ControlNumber::new(69);
pub const SOUND_CONTROLLER_1: ControlNumber = ControlNumber::new(70);
pub const SOUND_CONTROLLER_2: ControlNumber = ControlNumber::new(71);
pub const SOUND_CONTROLLER_3: ControlNumber = ControlNumber::new(72);
pub const SOUND_CONTROLLER_4: ControlNumber = ControlNumber::new(73);
pub const SOUND_CONTROLLER_5: ControlNumber = ControlNumber::new(74);
pub const SOUND_CONTROLLER_6: ControlNumber = ControlNumber::new(75);
pub const SOUND_CONTROLLER_7: ControlNumber = ControlNumber::new(76);
pub const SOUND_CONTROLLER_8: ControlNumber = ControlNumber::new(77);
pub const SOUND_CONTROLLER_9: ControlNumber = ControlNumber::new(78);
pub const SOUND_CONTROLLER_10: ControlNumber = ControlNumber::new(79);
pub const GENERAL_PURPOSE_SWITCH_1: ControlNumber = ControlNumber::new(80);
pub const GENERAL_PURPOSE_SWITCH_2: ControlNumber = ControlNumber::new(81);
pub const GENERAL_PURPOSE_SWITCH_3: ControlNumber = ControlNumber::new(82);
pub const GENERAL_PURPOSE_SWITCH_4: ControlNumber = ControlNumber::new(83);
pub const PORTAMENTO_CONTROL: ControlNumber = ControlNumber::new(84);
pub const EFFECTS_DEPTH_1: ControlNumber = ControlNumber::new(91);
pub const EFFECTS_DEPTH_2: ControlNumber = ControlNumber::new(92);
pub const EFFECTS_DEPTH_3: ControlNumber = ControlNumber::new(93);
pub const EFFECTS_DEPTH_4: ControlNumber = ControlNumber::new(94);
pub const EFFECTS_DEPTH_5: ControlNumber = ControlNumber::new(95);
pub const DATA_INCREMENT: ControlNumber = ControlNumber::new(96);
pub const DATA_DECREMENT: ControlNumber = ControlNumber::new(97);
pub const NRPN_LSB: ControlNumber = ControlNumber::new(98);
pub const NRPN_MSB: ControlNumber = ControlNumber::new(99);
pub const RPN_LSB: ControlNumber = ControlNumber::new(100);
pub const RPN_MSB: ControlNumber = ControlNumber::new(101);

// channel mode messages
pub const ALL_SOUND_OFF: ControlNumber = ControlNumber::new(120);
pub const RESET_ALL_CONTROLLERS: ControlNumber = ControlNumber::new(121);
pub const LOCAL_CONTROL: ControlNumber = ControlNumber::new(122);
pub const ALL_NOTES_OFF: ControlNumber = ControlNumber::new(123);
pub const OMNI_MODE_OFF: ControlNumber = ControlNumber::new(124);
pub const OMNI_MODE_ON: ControlNumber = ControlNumber::new(125);
pub const MONO_MODE: ControlNumber = ControlNumber::new(126);
pub const POLY_MODE: ControlNumber = ControlNumber::new(127);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigned_numbers() {
        assert_eq!(7, VOLUME.get());
        assert_eq!(39, VOLUME_LSB.get());
        assert_eq!(64, SUSTAIN_PEDAL.get());
        assert_eq!(123, ALL_NOTES_OFF.get());
    }
}
