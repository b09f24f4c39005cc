/// Validate that every stage has its logging codes registered
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::file_processor::init_file_processor_logging()?;
    crate::lexical::init_lexical_analysis_logging()?;
    crate::syntax::init_syntax_logging()?;

    crate::logging::codes::ensure_registered(&[
        crate::logging::codes::success::PIPELINE_COMPLETE,
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
    ])?;

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => 3,
        "profile" => crate::config::build_info::profile()
    );

    Ok(())
}
