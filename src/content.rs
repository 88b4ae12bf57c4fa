#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Section {
    #[default]
    About,
    Projects,
    Skills,
    Contact,
}

impl Section {
    pub const ALL: [Self; 4] = [Self::About, Self::Projects, Self::Skills, Self::Contact];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Projects => "projects",
            Self::Skills => "skills",
            Self::Contact => "contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::About => "About",
            Self::Projects => "Projects",
            Self::Skills => "Skills",
            Self::Contact => "Contact",
        }
    }

    pub fn enter_class(self) -> &'static str {
        match self {
            Self::About => "enter-from-left",
            Self::Projects => "enter-from-right",
            Self::Skills | Self::Contact => "enter-from-below",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Project {
    pub name: &'static str,
    pub description: &'static str,
    pub link: &'static str,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SocialLink {
    pub label: &'static str,
    pub href: &'static str,
    pub glyph: &'static str,
}

impl SocialLink {
    pub fn opens_new_tab(&self) -> bool {
        !self.href.starts_with("mailto:")
    }
}

pub struct Profile {
    pub name: &'static str,
    pub title: &'static str,
    pub bio: &'static str,
    pub links: &'static [SocialLink],
}

pub const PROFILE: Profile = Profile {
    name: "Pranay Anand",
    title: "Software Developer",
    bio: "I'm passionate about creating beautiful websites and building web applications \
          that enhance user experience. Currently seeking new opportunities to contribute \
          my skills and grow as a developer.",
    links: &[
        SocialLink {
            label: "GitHub",
            href: "https://github.com/pranayanand2001",
            glyph: "GH",
        },
        SocialLink {
            label: "LinkedIn",
            href: "https://www.linkedin.com/in/pranayanand2001",
            glyph: "in",
        },
        SocialLink {
            label: "Email",
            href: "mailto:pranayanand2001@gmail.com",
            glyph: "@",
        },
    ],
};

pub const SKILLS: [&str; 8] = [
    "JavaScript",
    "React",
    "Node.js",
    "Redux",
    "HTML/CSS",
    "SQL",
    "Express.js",
    "Tailwind CSS",
];

pub const PROJECTS: [Project; 3] = [
    Project {
        name: "Keeper",
        description: "A note-taking app inspired by Google Keep",
        link: "https://pranayanand2001.github.io/Keeper/",
    },
    Project {
        name: "ToDoList",
        description: "Task management application",
        link: "https://pranayanand2001.github.io/ToDoList/",
    },
    Project {
        name: "Simon Game",
        description: "Interactive memory game",
        link: "https://pranayanand2001.github.io/Simon_Game/",
    },
];

pub const CONTACT_HEADING: &str = "Get In Touch";
pub const CONTACT_INTRO: &str =
    "Have a question or want to work together? Feel free to reach out!";
