/// Drive columns plus participating company and job counts, for a `placement_drives d` alias
pub const DRIVE_WITH_COUNTS_SELECT: &str = r#"
    SELECT d.id, d.title, d.description, d.start_date, d.end_date, d.is_active,
           d.created_by, d.created_at, d.updated_at,
           (SELECT COUNT(*) FROM placement_drive_companies dc
             WHERE dc.drive_id = d.id) AS total_companies,
           (SELECT COUNT(*) FROM job_postings j
             JOIN placement_drive_companies dc ON dc.company_id = j.company_id
             WHERE dc.drive_id = d.id) AS total_jobs
    FROM placement_drives d
"#;
