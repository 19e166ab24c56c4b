//! Built-in starter FAQ set
//!
//! Used when no persisted FAQ document exists yet, or when the existing one
//! cannot be read. Keys are stored pre-normalized (lowercase, trimmed).

use indexmap::IndexMap;

/// The built-in question → answer pairs, in a stable insertion order
#[must_use]
pub fn default_faqs() -> IndexMap<String, String> {
    let pairs: &[(&str, &str)] = &[
        (
            "what is your name",
            "My name is Cairn. I'm the AI voice assistant for the supercomputing club.",
        ),
        (
            "who are you",
            "I'm Cairn, your AI assistant for the supercomputing club.",
        ),
        (
            "what are you called",
            "I'm called Cairn.",
        ),
        (
            "what is supercomputing",
            "Extremely powerful computing used for complex problems like AI training, \
             scientific modeling, and big data analysis.",
        ),
        (
            "how is supercomputing different from regular computing",
            "Supercomputers use many CPUs and GPUs working in parallel to handle large \
             complex tasks.",
        ),
        (
            "what is high-performance computing (hpc)",
            "HPC uses multiple powerful computers connected to solve large computational \
             problems.",
        ),
        (
            "what are flops",
            "Floating-point operations per second, a metric for computation speed.",
        ),
        (
            "what is exascale computing",
            "Computing at or above 10^18 operations per second.",
        ),
        (
            "examples of supercomputer uses?",
            "Protein folding, climate modeling, astrophysics, AI training, robotics.",
        ),
        (
            "how do gpus help supercomputing",
            "GPUs perform many parallel calculations, ideal for AI and HPC workloads.",
        ),
        (
            "what is cluster computing",
            "Connecting multiple computers for cooperative computing tasks.",
        ),
        (
            "what is nvidia dgx a100",
            "An AI supercomputer with 8 A100 GPUs, 640GB GPU memory, up to 5 petaFLOPS \
             performance.",
        ),
        (
            "what is the fastest supercomputer",
            "The Frontier Supercomputer in the USA, achieving about 1.1 exaFLOPS.",
        ),
        (
            "what is mixed precision training",
            "Using lower precision numbers like FP16 to speed up calculations with minimal \
             accuracy loss.",
        ),
        (
            "difference between data and model parallelism?",
            "Data parallelism splits data across devices; model parallelism splits the \
             model itself.",
        ),
        (
            "what industries rely on hpc",
            "Pharmaceuticals, aerospace, finance, weather forecasting, energy, and more.",
        ),
        (
            "why is linux important in hpc",
            "Linux provides a stable, customizable OS widely used in HPC clusters.",
        ),
        (
            "what is an hpc workload manager",
            "Software like Slurm or PBS scheduling and managing compute jobs efficiently.",
        ),
        (
            "who can join the club",
            "Any student passionate about AI, HPC, or computing technologies, regardless \
             of department or experience level.",
        ),
        (
            "is there a fee to join",
            "Membership is free; some advanced events may charge participation fees.",
        ),
    ];

    pairs
        .iter()
        .map(|(q, a)| ((*q).to_string(), (*a).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_non_empty_and_normalized() {
        let faqs = default_faqs();
        assert!(faqs.len() >= 10);
        for (question, answer) in &faqs {
            assert_eq!(question, &question.trim().to_lowercase());
            assert!(!answer.is_empty());
        }
    }

    #[test]
    fn defaults_have_stable_first_entry() {
        let faqs = default_faqs();
        let (first, _) = faqs.first().unwrap();
        assert_eq!(first, "what is your name");
    }
}
