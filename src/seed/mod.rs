//! Built-in bilingual content.
//!
//! These documents are written to an empty store on first initialization and
//! double as the static fallback table consulted when neither the store nor
//! the remote API can produce a document. Views take their default strings
//! from here and nowhere else.

use crate::domain::{
    BilingualText, Document, MediaItem, MediaType, NewsItem, Page, Section, TeamMember,
    Testimonial,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

pub const HOME_PAGE_ID: &str = "home";

fn text(fr: &str, ar: &str) -> BilingualText {
    BilingualText::new(fr, ar)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn timestamp(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Looks a document up in the built-in table.
pub fn static_fallback<D: Document>(id: &str) -> Option<D> {
    D::defaults().into_iter().find(|doc| doc.id() == id)
}

pub fn default_pages() -> Vec<Page> {
    vec![
        Page::new(HOME_PAGE_ID, text("Accueil", "الرئيسية"))
            .with_section(Section::new(
                "hero",
                text("Défendre les droits humains", "الدفاع عن حقوق الإنسان"),
                text(
                    "Nous œuvrons pour la dignité, la justice et l'égalité pour toutes et tous.",
                    "نعمل من أجل الكرامة والعدالة والمساواة للجميع.",
                ),
            ))
            .with_section(Section::new(
                "mission",
                text("Notre mission", "مهمتنا"),
                text(
                    "Accompagner les victimes, sensibiliser le public et plaider pour le respect des droits fondamentaux.",
                    "مرافقة الضحايا وتوعية الجمهور والدفاع عن احترام الحقوق الأساسية.",
                ),
            ))
            .with_section(Section::new(
                "values",
                text("Nos valeurs", "قيمنا"),
                text(
                    "Indépendance, transparence et solidarité.",
                    "الاستقلالية والشفافية والتضامن.",
                ),
            )),
        Page::new("about", text("À propos", "من نحن")).with_section(Section::new(
            "history",
            text("Notre histoire", "تاريخنا"),
            text(
                "Fondée par des militantes et militants engagés, l'association agit sur le terrain depuis sa création.",
                "تأسست الجمعية على يد مناضلات ومناضلين ملتزمين، وتعمل ميدانيًا منذ إنشائها.",
            ),
        )),
        Page::new("programs", text("Programmes", "البرامج"))
            .with_section(Section::new(
                "legal-aid",
                text("Aide juridique", "المساعدة القانونية"),
                text(
                    "Consultations juridiques gratuites et orientation des victimes.",
                    "استشارات قانونية مجانية وتوجيه الضحايا.",
                ),
            ))
            .with_section(Section::new(
                "training",
                text("Formation", "التكوين"),
                text(
                    "Ateliers de formation sur les droits humains.",
                    "ورشات تكوينية حول حقوق الإنسان.",
                ),
            )),
        Page::new("contact", text("Contact", "اتصل بنا")).with_section(Section::new(
            "contact-info",
            text("Nous contacter", "تواصلوا معنا"),
            text(
                "Écrivez-nous ou rendez-nous visite à nos bureaux.",
                "راسلونا أو زورونا في مكاتبنا.",
            ),
        )),
    ]
}

pub fn default_news() -> Vec<NewsItem> {
    vec![
        NewsItem {
            id: "news-1".to_string(),
            title: text(
                "Journée internationale des droits des femmes",
                "اليوم العالمي لحقوق المرأة",
            ),
            summary: text(
                "Retour sur nos actions du 8 mars.",
                "عودة على أنشطتنا يوم 8 مارس.",
            ),
            content: text(
                "Ateliers, débats et rencontres ont rassemblé plus de deux cents participantes.",
                "جمعت الورشات والنقاشات واللقاءات أكثر من مئتي مشاركة.",
            ),
            date: date(2024, 3, 8),
            image: None,
            published: true,
        },
        NewsItem {
            id: "news-2".to_string(),
            title: text(
                "Lancement du programme d'aide juridique",
                "إطلاق برنامج المساعدة القانونية",
            ),
            summary: text(
                "Des permanences gratuites ouvrent chaque semaine.",
                "تفتح مداومات مجانية كل أسبوع.",
            ),
            content: text(
                "Nos juristes reçoivent les personnes sans rendez-vous tous les mercredis.",
                "يستقبل قانونيونا الأشخاص دون موعد كل يوم أربعاء.",
            ),
            date: date(2024, 5, 15),
            image: None,
            published: true,
        },
    ]
}

pub fn default_team() -> Vec<TeamMember> {
    vec![
        TeamMember {
            id: "team-1".to_string(),
            name: text("Amina Benali", "أمينة بن علي"),
            role: text("Présidente", "الرئيسة"),
            bio: text(
                "Avocate, engagée depuis vingt ans pour l'accès au droit.",
                "محامية، ملتزمة منذ عشرين سنة بالحق في الولوج إلى العدالة.",
            ),
            image: None,
            position: 0,
        },
        TeamMember {
            id: "team-2".to_string(),
            name: text("Karim Haddad", "كريم حداد"),
            role: text("Coordinateur des programmes", "منسق البرامج"),
            bio: text(
                "Pilote les actions de terrain et les partenariats.",
                "يشرف على الأنشطة الميدانية والشراكات.",
            ),
            image: None,
            position: 1,
        },
        TeamMember {
            id: "team-3".to_string(),
            name: text("Salma Idrissi", "سلمى الإدريسي"),
            role: text("Chargée de communication", "مكلفة بالتواصل"),
            bio: text(
                "Fait connaître nos campagnes auprès du public.",
                "تعرّف الجمهور بحملاتنا.",
            ),
            image: None,
            position: 2,
        },
    ]
}

pub fn default_testimonials() -> Vec<Testimonial> {
    vec![
        Testimonial {
            id: "testimonial-1".to_string(),
            name: "Fatima Z.".to_string(),
            role: text("Bénéficiaire", "مستفيدة"),
            content: text(
                "L'équipe m'a écoutée et accompagnée à chaque étape.",
                "استمع إليّ الفريق ورافقني في كل مرحلة.",
            ),
            rating: 5,
            date: date(2024, 1, 20),
            image: None,
        },
        Testimonial {
            id: "testimonial-2".to_string(),
            name: "Youssef M.".to_string(),
            role: text("Bénévole", "متطوع"),
            content: text(
                "Une association sérieuse où chacun peut agir.",
                "جمعية جادة يستطيع فيها كل واحد أن يساهم.",
            ),
            rating: 5,
            date: date(2024, 2, 11),
            image: None,
        },
        Testimonial {
            id: "testimonial-3".to_string(),
            name: "Nadia K.".to_string(),
            role: text("Partenaire", "شريكة"),
            content: text(
                "Des formations claires et utiles pour nos équipes.",
                "تكوينات واضحة ومفيدة لفرقنا.",
            ),
            rating: 4,
            date: date(2024, 4, 2),
            image: None,
        },
    ]
}

pub fn default_media() -> Vec<MediaItem> {
    vec![
        MediaItem {
            id: "media-1".to_string(),
            title: text("Rapport annuel 2023", "التقرير السنوي 2023"),
            media_type: MediaType::Document,
            url: "/uploads/rapport-annuel-2023.pdf".to_string(),
            description: Some(text(
                "Bilan de nos activités de l'année.",
                "حصيلة أنشطتنا خلال السنة.",
            )),
            uploaded_at: timestamp(2024, 1, 15),
        },
        MediaItem {
            id: "media-2".to_string(),
            title: text("Atelier de sensibilisation", "ورشة تحسيسية"),
            media_type: MediaType::Image,
            url: "/uploads/atelier-sensibilisation.jpg".to_string(),
            description: None,
            uploaded_at: timestamp(2024, 3, 9),
        },
    ]
}
