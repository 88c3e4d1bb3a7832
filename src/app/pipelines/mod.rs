pub mod eligibility_pipeline;
