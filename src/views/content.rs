//! Static educational copy shown on the Home, Visualizations and About views.

/// A heading, an optional lead paragraph, and an optional bullet list.
pub struct Section {
    pub heading: &'static str,
    pub lead: &'static str,
    pub bullets: &'static [&'static str],
    pub trailer: &'static str,
}

pub const HOME_TITLE: &str = "Cardiovascular Disease";

pub const HOME_INTRO: Section = Section {
    heading: "What is Cardiovascular Disease?",
    lead: "Cardiovascular disease (CVD) is a general term for conditions affecting the heart or \
           blood vessels. It's usually associated with a build-up of fatty deposits inside the \
           arteries (atherosclerosis) and an increased risk of blood clots. It can also be \
           associated with damage to arteries in organs such as the brain, heart, kidneys and eyes.",
    bullets: &[],
    trailer: "",
};

/// Shown after the illustration.
pub const HOME_SECTIONS: &[Section] = &[
    Section {
        heading: "Causes of Cardiovascular Disease",
        lead: "The most common causes behind cardiovascular diseases include:",
        bullets: &[
            "High blood pressure",
            "Smoking",
            "High cholesterol",
            "Diabetes",
            "Inactivity",
            "Being overweight or obese",
            "Family history of CVD",
            "Ethnic background",
            "Excessive alcohol intake",
        ],
        trailer: "",
    },
    Section {
        heading: "Symptoms",
        lead: "If these symptoms are present, the person may be having a cardiovascular event:",
        bullets: &[
            "Chest pain",
            "Pain, weakness or numbness in the limbs",
            "Shortness of breath",
            "Very fast or slow heartbeat",
            "Dizziness or fainting",
            "Fatigue",
            "Swelling in the legs, ankles or feet",
        ],
        trailer: "",
    },
    Section {
        heading: "Treatment",
        lead: "The best way to prevent cardiovascular disease is by adopting a healthy lifestyle:",
        bullets: &[
            "Stop smoking",
            "Eat a balanced diet",
            "Exercise regularly",
            "Maintain a healthy weight",
            "Reduce alcohol consumption",
            "Manage stress",
        ],
        trailer: "Medication and sometimes surgery may also be required, depending on the \
                  severity of the condition.",
    },
];

pub const VISUALIZATIONS_INTRO: &str = "You can visualize the data to gain insights about the \
    patterns and distribution of various health indicators among individuals.";

pub const ABOUT_TITLE: &str = "About This Project";

pub const ABOUT_SECTIONS: &[Section] = &[
    Section {
        heading: "What follow-up care should I expect?",
        lead: "After you've had a heart attack, you're at a higher risk of a similar occurrence. \
               Your healthcare provider will likely recommend follow-up monitoring, testing and \
               care to avoid future heart attacks. Some of these include:",
        bullets: &[
            "Heart scans: Similar to the methods used to diagnose a heart attack, these can \
             assess the effects of your heart attack and determine if you have permanent heart \
             damage. They can also look for signs of heart and circulatory problems that \
             increase the chance of future heart attacks.",
            "Stress test: These heart tests and scans that take place while you're exercising \
             can show potential problems that stand out only when your heart is working harder.",
            "Cardiac rehabilitation: These programs help you improve your overall health and \
             lifestyle, which can prevent another heart attack.",
        ],
        trailer: "Additionally, you'll continue to take medicines, some of the ones you received \
                  for immediate treatment of your heart attack, long-term. These include \
                  beta-blockers, ACE inhibitors, and aspirin and other blood-thinning agents.",
    },
    Section {
        heading: "How soon after treatment will I feel better?",
        lead: "In general, your heart attack symptoms should decrease as you receive treatment. \
               You'll likely have some lingering weakness and fatigue during your hospital stay \
               and for several days after. Recovery also varies with the treatment method; the \
               average hospital stay for a heart attack is between four and five days:",
        bullets: &[
            "Medication only: People treated with medication only have an average hospital stay \
             of approximately six days.",
            "PCI: Recovering from PCI is easier than surgery because it's a less invasive method \
             for treating a heart attack. The average length of stay for PCI is about four days.",
            "CABG: Recovery from heart bypass surgery takes longer because it's a major surgery. \
             The average length of stay for CABG is about seven days.",
        ],
        trailer: "",
    },
];

/// Caption shown under the categorical inputs of the prediction form.
pub fn field_hint(field: crate::prediction::Field) -> Option<&'static str> {
    use crate::prediction::Field;

    match field {
        Field::Gender => Some("The value 1 is women and value 2 is men."),
        Field::Cholesterol => Some("Cholesterol levels: 1 - Normal, 2 - Above Normal, 3 - Well Above Normal."),
        Field::Glucose => Some("Glucose levels: 1 - Normal, 2 - Above Normal, 3 - Well Above Normal."),
        Field::Alcohol => Some("Alcohol intake: 1 - No, 2 - Yes."),
        Field::Activity => Some("Activity level: 1 - Low, 2 - High."),
        _ => None,
    }
}
