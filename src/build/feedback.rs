use colored::*;

/// Turns captured compiler/linker output into a one-paragraph hint.
pub struct FeedbackAnalyzer;

impl FeedbackAnalyzer {
    pub fn analyze(output: &str) -> Option<String> {
        // Compiler or linker program could not be started
        if output.contains("os error 2") {
            return Some(format!(
                "The {} could not be started.\nInstall g++ or point {} at your C++ compiler.",
                "compiler".bold().red(),
                "CXX".bold().yellow()
            ));
        }

        if output.contains("undefined reference to `main'") {
            return Some(format!(
                "Your project is missing a {} function.\nCheck that the file defining it is listed in {}.",
                "main()".bold().yellow(),
                "source_files".bold().green()
            ));
        }

        if output.contains("undefined reference to") || output.contains("cannot find -l") {
            return Some(format!(
                "It looks like a {} error.\nCheck {} and that {} reports the gtkmm libraries.",
                "Linker".bold().red(),
                "custom_link_flags".bold().yellow(),
                "pkg-config gtkmm-3.0 --libs".bold().green()
            ));
        }

        if output.contains("fatal error: ") && output.contains("No such file or directory") {
            return Some(format!(
                "It looks like a {} error.\nInstall the gtkmm development package or add an include path to {}.",
                "Missing Header".bold().red(),
                "custom_compile_flags".bold().yellow()
            ));
        }

        None
    }
}
