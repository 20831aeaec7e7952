use camkit_parser::{Code, GcodeParser, ModalState};

#[test]
fn test_modal_snapshot_per_command() {
    let outcome = GcodeParser::new().parse("G20 G91\nG1 X1 F10\nG90 G21\nM3 S1000\nM5\n");
    let modes: Vec<(u8, u8, u8, u8)> = outcome
        .commands
        .iter()
        .map(|c| {
            (
                c.modal.motion_mode,
                c.modal.units_mode,
                c.modal.distance_mode,
                c.modal.spindle,
            )
        })
        .collect();
    assert_eq!(
        modes,
        vec![
            (0, 20, 91, 5),
            (1, 20, 91, 5),
            (1, 21, 90, 5),
            (1, 21, 90, 3),
            (1, 21, 90, 5),
        ]
    );
}

#[test]
fn test_defaults() {
    let modal = ModalState::default();
    assert_eq!(modal.motion_mode, 0);
    assert_eq!(modal.plane_mode, 17);
    assert_eq!(modal.units_mode, 21);
    assert_eq!(modal.distance_mode, 90);
    assert_eq!(modal.feed_rate_mode, 94);
    assert_eq!(modal.coordinate_system, 54);
    assert_eq!(modal.compensation_mode, 40);
}

#[test]
fn test_non_modal_codes_do_not_change_state() {
    let mut modal = ModalState::default();
    assert!(!modal.apply(&Code::g(4)));
    assert!(!modal.apply(&Code::g(28)));
    assert_eq!(modal, ModalState::default());

    assert!(modal.apply(&Code::g(18)));
    assert_eq!(modal.plane_mode, 18);
}

#[test]
fn test_motion_mode_persists_across_lines() {
    let outcome = GcodeParser::new().parse("G1 X1 F100\nX2\nY3\n");
    assert!(outcome.commands.iter().all(|c| c.modal.motion_mode == 1));
    assert_eq!(outcome.toolpath.len(), 3);
}
