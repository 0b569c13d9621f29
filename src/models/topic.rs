use serde::{Deserialize, Serialize};

use super::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// A debate motion with the key arguments for each side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionBrief {
    pub id: String,
    pub title: String,
    pub motion: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Speaking time limit in seconds
    pub time_limit_secs: u64,
    pub government: Vec<String>,
    pub opposition: Vec<String>,
}

impl MotionBrief {
    /// Key arguments for one side of the house
    pub fn arguments(&self, role: Role) -> &[String] {
        match role {
            Role::Government => &self.government,
            Role::Opposition => &self.opposition,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Motions bundled with the crate
pub fn builtin_motions() -> Vec<MotionBrief> {
    vec![
        MotionBrief {
            id: "homework-ban".to_string(),
            title: "Homework Ban in Primary Schools".to_string(),
            motion: "This house would ban homework in primary schools".to_string(),
            description: "Debate whether young children should have homework assignments"
                .to_string(),
            difficulty: Difficulty::Beginner,
            time_limit_secs: 600,
            government: strings(&[
                "Homework creates unnecessary stress for young children and families",
                "Children learn better through play and exploration at home",
                "Family time is more valuable than additional study time",
                "Homework creates inequality between families with different resources",
            ]),
            opposition: strings(&[
                "Homework reinforces learning and helps develop study habits",
                "Parents can be involved in their child's education through homework",
                "Homework prepares children for increased academic responsibility",
                "Practice at home helps consolidate classroom learning",
            ]),
        },
        MotionBrief {
            id: "social-media-age".to_string(),
            title: "Social Media Age Restrictions".to_string(),
            motion: "This house would ban social media for users under 16".to_string(),
            description: "Explore the impact of social media on young people's development"
                .to_string(),
            difficulty: Difficulty::Intermediate,
            time_limit_secs: 900,
            government: strings(&[
                "Social media negatively impacts mental health and self-esteem in teenagers",
                "Young people are vulnerable to cyberbullying and online predators",
                "Social media addiction interferes with academic performance and real-world relationships",
                "Age restrictions would protect developing minds from harmful content",
            ]),
            opposition: strings(&[
                "Social media provides valuable educational and creative opportunities",
                "Young people can develop digital literacy and communication skills",
                "Age restrictions are difficult to enforce and may drive underground usage",
                "Social media helps young people connect with communities and support networks",
            ]),
        },
        MotionBrief {
            id: "climate-refugees".to_string(),
            title: "Climate Refugee Acceptance".to_string(),
            motion: "This house believes developed nations should accept unlimited climate refugees"
                .to_string(),
            description: "Examine the responsibilities of wealthy nations toward climate displacement"
                .to_string(),
            difficulty: Difficulty::Advanced,
            time_limit_secs: 1200,
            government: strings(&[
                "Developed nations have historical responsibility for climate change",
                "Moral obligation to help those displaced by environmental disasters",
                "Economic benefits from increased immigration and workforce diversity",
                "International cooperation is essential for addressing global challenges",
            ]),
            opposition: strings(&[
                "Unlimited immigration could strain public services and infrastructure",
                "Need for controlled immigration to maintain social cohesion",
                "Other solutions like climate adaptation funding may be more effective",
                "National sovereignty includes the right to control immigration policy",
            ]),
        },
    ]
}

/// Look up a bundled motion by id
pub fn find_motion(id: &str) -> Option<MotionBrief> {
    builtin_motions().into_iter().find(|m| m.id == id)
}
