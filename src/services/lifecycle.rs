//! Equipment lifecycle state machine: diff classification
//!
//! Every equipment mutation is classified into exactly one semantic event.
//! The rules below are mutually exclusive and checked in priority order:
//!
//! 1. a holder appears         → one of the ASSIGN_* events
//! 2. the holder disappears    → RETURN
//! 3. physical status crosses the repair boundary → REPAIR_START / REPAIR_END
//! 4. pure workflow progression (assignment status moves, same holder)
//! 5. anything else            → generic UPDATE with a diff description

use crate::models::{
    enums::{AssignmentStatus, EquipmentStatus, EventType},
    Equipment, EventMetadata,
};

/// Classified equipment mutation, ready to be logged
#[derive(Debug, Clone)]
pub struct EquipmentChange {
    pub event_type: EventType,
    pub description: String,
    pub metadata: EventMetadata,
}

/// Classify the diff between `old` and `new` into one semantic event.
pub fn classify(old: &Equipment, new: &Equipment) -> EquipmentChange {
    let mut metadata = EventMetadata::new();
    metadata.insert("from_status".into(), old.status.as_str().into());
    metadata.insert("to_status".into(), new.status.as_str().into());
    metadata.insert(
        "from_assignment".into(),
        old.assignment_status.as_str().into(),
    );
    metadata.insert("to_assignment".into(), new.assignment_status.as_str().into());

    if old.user.is_none() && new.user.is_some() {
        let beneficiary = new.user_name.clone().unwrap_or_else(|| "unknown".into());
        metadata.insert("beneficiary_id".into(), new.user.clone().unwrap_or_default());
        metadata.insert("beneficiary_name".into(), beneficiary.clone());

        let event_type = if new.assignment_status == AssignmentStatus::Confirmed
            || new.status == EquipmentStatus::Assigned
        {
            EventType::AssignConfirmed
        } else if new.assignment_status == AssignmentStatus::WaitingManagerApproval {
            EventType::AssignManagerWait
        } else if new.assignment_status == AssignmentStatus::WaitingDotationApproval {
            EventType::AssignDotationWait
        } else {
            EventType::AssignPending
        };
        let description = match event_type {
            EventType::AssignConfirmed => format!("Assigned to {beneficiary}"),
            EventType::AssignManagerWait => {
                format!("Reserved for {beneficiary}, awaiting manager approval")
            }
            EventType::AssignDotationWait => {
                format!("Reserved for {beneficiary}, awaiting dotation approval")
            }
            _ => format!("Assigned to {beneficiary}, pending delivery"),
        };
        return EquipmentChange {
            event_type,
            description,
            metadata,
        };
    }

    if old.user.is_some() && new.user.is_none() {
        let previous = old.user_name.clone().unwrap_or_else(|| "unknown".into());
        metadata.insert(
            "previous_holder_id".into(),
            old.user.clone().unwrap_or_default(),
        );
        metadata.insert("previous_holder_name".into(), previous.clone());

        let description = if old.assignment_status == AssignmentStatus::PendingReturn {
            if new.status == EquipmentStatus::UnderRepair {
                format!("Returned by {previous}: inspected, sent to repair")
            } else {
                format!("Returned by {previous}: inspected, back in stock")
            }
        } else {
            format!("Returned by {previous}")
        };
        return EquipmentChange {
            event_type: EventType::Return,
            description,
            metadata,
        };
    }

    if old.status != EquipmentStatus::UnderRepair && new.status == EquipmentStatus::UnderRepair {
        return EquipmentChange {
            event_type: EventType::RepairStart,
            description: format!("{} sent to repair", new.asset_id),
            metadata,
        };
    }
    if old.status == EquipmentStatus::UnderRepair && new.status != EquipmentStatus::UnderRepair {
        return EquipmentChange {
            event_type: EventType::RepairEnd,
            description: format!("{} back from repair", new.asset_id),
            metadata,
        };
    }

    if old.assignment_status != new.assignment_status {
        let event_type = match new.assignment_status {
            AssignmentStatus::WaitingManagerApproval => EventType::AssignManagerWait,
            AssignmentStatus::WaitingItProcessing => EventType::AssignItProcessing,
            AssignmentStatus::WaitingDotationApproval => EventType::AssignDotationWait,
            AssignmentStatus::PendingDelivery => EventType::AssignPending,
            AssignmentStatus::PendingReturn => EventType::Return,
            AssignmentStatus::Confirmed => EventType::AssignConfirmed,
            AssignmentStatus::Disputed => EventType::AssignDisputed,
            AssignmentStatus::None => EventType::Update,
        };
        let holder = new.user_name.clone().unwrap_or_else(|| "unknown".into());
        let description = match event_type {
            EventType::AssignManagerWait => format!("Awaiting manager approval for {holder}"),
            EventType::AssignItProcessing => format!("IT processing assignment to {holder}"),
            EventType::AssignDotationWait => format!("Awaiting dotation approval for {holder}"),
            EventType::AssignPending => format!("Approved for {holder}, pending delivery"),
            EventType::Return => format!("Return requested by {holder}"),
            EventType::AssignConfirmed => format!("Receipt confirmed by {holder}"),
            EventType::AssignDisputed => format!("Delivery disputed by {holder}"),
            _ => format!(
                "Assignment status changed from {} to {}",
                old.assignment_status, new.assignment_status
            ),
        };
        return EquipmentChange {
            event_type,
            description,
            metadata,
        };
    }

    // Generic update
    let mut changes = Vec::new();
    if old.status != new.status {
        changes.push(format!(
            "status changed from {} to {}",
            old.status, new.status
        ));
    }
    if old.user != new.user {
        changes.push(format!(
            "reassigned from {} to {}",
            old.user_name.as_deref().unwrap_or("unknown"),
            new.user_name.as_deref().unwrap_or("unknown")
        ));
    }
    if old.model != new.model {
        changes.push(format!("model changed to {}", new.model));
    }
    if old.equipment_type != new.equipment_type {
        changes.push(format!("type changed to {}", new.equipment_type));
    }
    let description = if changes.is_empty() {
        format!("{} updated", new.asset_id)
    } else {
        format!("{} updated: {}", new.asset_id, changes.join(", "))
    };

    EquipmentChange {
        event_type: EventType::Update,
        description,
        metadata,
    }
}
