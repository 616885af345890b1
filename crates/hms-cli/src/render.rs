//! Plain-text tables for the terminal

use hms_app::{Dashboard, MenuItem};
use hms_core::{AppointmentRow, DoctorProfileFields, DoctorRecord, PatientRecord, RosterEntry};

const DASH: &str = "-";

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => DASH,
    }
}

pub(crate) fn appointments(rows: &[AppointmentRow]) {
    if rows.is_empty() {
        println!("No appointments found");
        return;
    }
    println!(
        "{:<8} {:<14} {:<20} {:<20} {:<11} {:<9} {:<10} {:<10} {}",
        "ID", "CODE", "PATIENT", "DOCTOR", "DATE", "TIME", "SEVERITY", "STATUS", "PROBLEM"
    );
    for row in rows {
        println!(
            "{:<8} {:<14} {:<20} {:<20} {:<11} {:<9} {:<10} {:<10} {}",
            row.id,
            row.appointment_code,
            row.patient_name,
            row.doctor_name,
            row.date_display,
            row.time_display,
            row.severity.as_str(),
            row.status,
            row.problem
        );
        if let Some(reason) = &row.cancellation_reason {
            println!("{:<8} reason: {reason}", "");
        }
    }
}

pub(crate) fn appointment(row: &AppointmentRow) {
    println!("Appointment {}", row.appointment_code);
    println!("  patient:   {}", row.patient_name);
    println!("  contact:   {}", or_dash(row.patient_contact.as_deref()));
    println!("  doctor:    {}", row.doctor_name);
    println!("  booked:    {} {}", row.date_display, row.time_display);
    println!("  problem:   {}", row.problem);
    println!("  severity:  {}", row.severity.as_str());
    println!("  duration:  {}", or_dash(row.duration.as_deref()));
    println!("  history:   {}", or_dash(row.medical_history.as_deref()));
    println!("  status:    {}", row.status);
    if let Some(reason) = &row.cancellation_reason {
        println!("  reason:    {reason}");
    }
    if let Some(result) = &row.result {
        println!("  result:    {result}");
    }
}

pub(crate) fn dashboard(dashboard: &Dashboard) {
    println!("{}", dashboard.greeting);
    println!();
    for card in &dashboard.cards {
        println!("  {:<24} {}", card.title, card.value);
    }
    println!();
    println!("Recent appointments");
    appointments(&dashboard.recent);
}

pub(crate) fn doctors(doctors: &[&DoctorRecord]) {
    if doctors.is_empty() {
        println!("No doctors found");
        return;
    }
    println!(
        "{:<38} {:<22} {:<18} {:<12} {}",
        "ID", "NAME", "SPECIALIZATION", "EXPERIENCE", "EMAIL"
    );
    for doctor in doctors {
        println!(
            "{:<38} {:<22} {:<18} {:<12} {}",
            doctor.id,
            doctor.name,
            or_dash(doctor.specialization.as_deref()),
            or_dash(doctor.experience.as_deref()),
            or_dash(doctor.email.as_deref())
        );
    }
}

pub(crate) fn roster(entries: &[&RosterEntry]) {
    if entries.is_empty() {
        println!("No patients found");
        return;
    }
    println!("{:<22} {:<16} {:<13} {}", "NAME", "CONTACT", "APPOINTMENTS", "LAST VISIT");
    for entry in entries {
        println!(
            "{:<22} {:<16} {:<13} {}",
            entry.name, entry.contact, entry.appointment_count, entry.last_visit
        );
    }
}

pub(crate) fn doctor_profile(profile: &DoctorProfileFields) {
    let fields = [
        ("name", &profile.name),
        ("email", &profile.email),
        ("phone", &profile.phone),
        ("qualification", &profile.qualification),
        ("specialization", &profile.specialization),
        ("experience", &profile.experience),
        ("department", &profile.department),
        ("bio", &profile.bio),
    ];
    for (label, value) in fields {
        println!("  {label:<15} {}", or_dash(Some(value)));
    }
}

pub(crate) fn patient_profile(record: &PatientRecord) {
    println!("  {:<15} {}", "name", record.name);
    println!("  {:<15} {}", "contact", record.contact);
    if let Some(created) = record.created_at {
        println!("  {:<15} {}", "member since", created.format("%-m/%-d/%Y"));
    }
}

pub(crate) fn menu(items: &[MenuItem]) {
    for item in items {
        println!("  {:<20} {}", item.label, item.route.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_render_as_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(Some("MBBS")), "MBBS");
    }
}
