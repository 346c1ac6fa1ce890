//! Bilingual demo question set.

/// Twenty workplace questions, English then French.
pub const DEMO_QUESTIONS: [&str; 20] = [
    "How can we improve team collaboration and communication?",
    "What training programs do we need for skill development?",
    "How do we protect sensitive customer data?",
    "What's our strategy for market expansion next year?",
    "How can we foster innovation and creativity?",
    "What work-life balance policies should we implement?",
    "How do we measure employee satisfaction?",
    "What's our approach to sustainable business practices?",
    "How can we improve customer support response time?",
    "What recognition programs motivate our team?",
    "Comment améliorer la communication entre départements?",
    "Quels sont nos objectifs de croissance à 5 ans?",
    "Comment garantir la sécurité des données clients?",
    "Quelle culture d'entreprise voulons-nous développer?",
    "Comment encourager l'initiative personnelle?",
    "Quels outils collaboratifs adopter?",
    "Comment mesurer notre impact social?",
    "Quelle stratégie de recrutement pour 2025?",
    "Comment améliorer la rétention des talents?",
    "Quel processus d'innovation mettre en place?",
];
