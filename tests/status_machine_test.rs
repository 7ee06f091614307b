// ==========================================
// 物流状态机测试
// ==========================================
// 测试范围:
// 1. 邻接表与业务流程一致
// 2. 主状态映射全覆盖
// 3. 未知输入降级为安全默认值
// ==========================================

use parcel_logistics::engine::status_machine::{UNKNOWN_STATUS_COLOR, UNKNOWN_STATUS_LABEL};
use parcel_logistics::{InterfaceKind, LogisticStatus, LogisticStatusMachine, MainStatus};

use LogisticStatus::*;

#[test]
fn test_adjacency_table() {
    let expected: &[(LogisticStatus, &[LogisticStatus])] = &[
        (PendingReception, &[Received]),
        (Received, &[Weighed, Verified, WeightIssue, SpecialCase]),
        (Weighed, &[Verified, WeightIssue]),
        (Verified, &[Sorted, ReadyGrouping]),
        (WeightIssue, &[Verified, SpecialCase]),
        (ReadyGrouping, &[Grouped]),
        (Grouped, &[Shipped]),
        (Shipped, &[ArrivedDestination]),
        (ArrivedDestination, &[ReadyPickup]),
        (ReadyPickup, &[Delivered]),
        (Delivered, &[]),
        (SpecialCase, &[Verified, Sorted]),
        (Sorted, &[ReadyGrouping]),
    ];

    for (from, successors) in expected {
        for to in LogisticStatus::ALL {
            assert_eq!(
                LogisticStatusMachine::is_transition_allowed(*from, to),
                successors.contains(&to),
                "{} -> {}",
                from,
                to
            );
        }
    }
}

#[test]
fn test_happy_path_is_legal() {
    let path = [
        PendingReception,
        Received,
        Weighed,
        Verified,
        Sorted,
        ReadyGrouping,
        Grouped,
        Shipped,
        ArrivedDestination,
        ReadyPickup,
        Delivered,
    ];

    for pair in path.windows(2) {
        assert!(LogisticStatusMachine::is_transition_allowed(pair[0], pair[1]));
    }
}

#[test]
fn test_special_case_reenters_main_flow() {
    assert!(LogisticStatusMachine::is_transition_allowed(WeightIssue, SpecialCase));
    assert!(LogisticStatusMachine::is_transition_allowed(SpecialCase, Verified));
    assert!(LogisticStatusMachine::is_transition_allowed(SpecialCase, Sorted));
    assert!(!LogisticStatusMachine::is_transition_allowed(SpecialCase, Received));
}

#[test]
fn test_main_status_is_total() {
    for status in LogisticStatus::ALL {
        let main = LogisticStatusMachine::main_status(status);
        assert!(MainStatus::ALL.contains(&main));
    }
}

#[test]
fn test_every_main_status_is_used() {
    for main in MainStatus::ALL {
        assert!(LogisticStatus::ALL
            .iter()
            .any(|s| LogisticStatusMachine::main_status(*s) == main));
    }
}

#[test]
fn test_unknown_inputs_degrade() {
    assert!(!LogisticStatusMachine::is_transition_allowed_raw("archived", "received"));
    assert_eq!(LogisticStatusMachine::label_raw("archived"), UNKNOWN_STATUS_LABEL);
    assert_eq!(LogisticStatusMachine::color_class_raw("archived"), UNKNOWN_STATUS_COLOR);
    assert!(!LogisticStatusMachine::is_visible_in_interface_raw("archived", "reception"));
}

#[test]
fn test_reception_interface_only_sees_entry_states() {
    let visible: Vec<_> = LogisticStatus::ALL
        .into_iter()
        .filter(|s| LogisticStatusMachine::is_visible_in_interface(*s, InterfaceKind::Reception))
        .collect();
    assert_eq!(visible, vec![PendingReception, Received]);
}
