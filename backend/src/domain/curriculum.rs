//! Course catalog and welcome letter content.
//!
//! A total mapping from [`Course`] to curriculum content. Course identity is
//! carried by the enum itself, so there is no name matching anywhere in
//! here: every course has a curriculum by construction.

use shared::{ChildRecord, Course, CurriculumInfo};

/// Static curriculum content for one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Curriculum {
    pub course: Course,
    pub summary: &'static str,
    pub topics: &'static [&'static str],
    /// Recommended follow-on program for the enrollment page.
    pub next_stage: Course,
}

/// Total: every course maps to exactly one curriculum.
pub fn curriculum_for(course: Course) -> Curriculum {
    match course {
        Course::WebDevelopment => Curriculum {
            course,
            summary: "HTML, CSS, JavaScript, and modern frameworks",
            topics: &[
                "Building pages with HTML and CSS",
                "Programming the browser with JavaScript",
                "Responsive layouts",
                "A first modern framework project",
            ],
            next_stage: Course::PythonAndAi,
        },
        Course::PythonAndAi => Curriculum {
            course,
            summary: "Programming fundamentals and machine learning",
            topics: &[
                "Python programming fundamentals",
                "Working with data",
                "Training a first machine learning model",
                "Building a small AI project",
            ],
            next_stage: Course::Robotics,
        },
        Course::Robotics => Curriculum {
            course,
            summary: "Hardware programming and autonomous systems",
            topics: &[
                "Microcontrollers and sensors",
                "Motors and actuators",
                "Programming autonomous behavior",
                "A team robot build",
            ],
            next_stage: Course::WebDevelopment,
        },
    }
}

impl From<Curriculum> for CurriculumInfo {
    fn from(curriculum: Curriculum) -> Self {
        CurriculumInfo {
            course: curriculum.course,
            summary: curriculum.summary.to_string(),
            topics: curriculum.topics.iter().map(|t| t.to_string()).collect(),
            next_stage: curriculum.next_stage,
        }
    }
}

/// The personalized welcome letter shown beside the certificate.
pub fn welcome_letter(child: &ChildRecord) -> String {
    let curriculum = curriculum_for(child.course);
    let topics = curriculum
        .topics
        .iter()
        .map(|topic| format!("- {topic}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Dear Parent/Guardian,\n\n\
        Congratulations! We are thrilled to celebrate {name}'s successful completion \
        of the {course} program in {completed}. This achievement represents dedication, \
        hard work, and a commitment to learning that will serve them well throughout \
        their educational journey.\n\n\
        Over the course of the program, {name} worked through:\n{topics}\n\n\
        We hope this is just the beginning of a lifelong love of learning. When you \
        are ready for the next step, we recommend the {next} program as a natural \
        continuation. Thank you for trusting us with your child's education and for \
        your continued support.\n\n\
        Warm regards,\nThe Sparklab Team",
        name = child.name,
        course = child.course,
        completed = child.completion_date,
        topics = topics,
        next = curriculum.next_stage,
    )
}
