//! Built-in nuclide data: the default (most abundant or longest-lived) isotope of every
//! element, plus further tabulated isotopes for elements where alternates are common.

/// `(mass_number, mass)` of the default isotope, indexed by `Z - 1`.
pub(super) static DEFAULT_ISOTOPES: [(u32, f64); 118] = [
    (1, 1.00782503207), // H
    (4, 4.00260325413), // He
    (7, 7.0160034366), // Li
    (9, 9.012183065), // Be
    (11, 11.00930536), // B
    (12, 12.0), // C
    (14, 14.00307400443), // N
    (16, 15.99491461957), // O
    (19, 18.99840316273), // F
    (20, 19.9924401762), // Ne
    (23, 22.9897692820), // Na
    (24, 23.985041697), // Mg
    (27, 26.98153853), // Al
    (28, 27.97692653465), // Si
    (31, 30.97376199842), // P
    (32, 31.9720711744), // S
    (35, 34.96885268), // Cl
    (40, 39.9623831237), // Ar
    (39, 38.9637064864), // K
    (40, 39.962590863), // Ca
    (45, 44.95590828), // Sc
    (48, 47.94794198), // Ti
    (51, 50.94395704), // V
    (52, 51.94050623), // Cr
    (55, 54.93804391), // Mn
    (56, 55.93493633), // Fe
    (59, 58.93319429), // Co
    (58, 57.93534241), // Ni
    (63, 62.92959772), // Cu
    (64, 63.92914201), // Zn
    (69, 68.9255735), // Ga
    (74, 73.921177761), // Ge
    (75, 74.92159457), // As
    (80, 79.9165218), // Se
    (79, 78.9183376), // Br
    (84, 83.9114977282), // Kr
    (85, 84.9117897379), // Rb
    (88, 87.9056125), // Sr
    (89, 88.9058403), // Y
    (90, 89.9046977), // Zr
    (93, 92.9063730), // Nb
    (98, 97.90540482), // Mo
    (97, 96.9063667), // Tc
    (102, 101.9043441), // Ru
    (103, 102.905498), // Rh
    (106, 105.903483), // Pd
    (107, 106.905092), // Ag
    (114, 113.903365), // Cd
    (115, 114.903878776), // In
    (120, 119.902202), // Sn
    (121, 120.903812), // Sb
    (130, 129.906222748), // Te
    (127, 126.904473), // I
    (132, 131.904155086), // Xe
    (133, 132.905451961), // Cs
    (138, 137.905247), // Ba
    (139, 138.906353), // La
    (140, 139.905439), // Ce
    (141, 140.907657), // Pr
    (142, 141.907729), // Nd
    (145, 144.912756), // Pm
    (152, 151.919739), // Sm
    (153, 152.921238), // Eu
    (158, 157.924112), // Gd
    (159, 158.925354), // Tb
    (164, 163.929181), // Dy
    (165, 164.930328), // Ho
    (166, 165.930299), // Er
    (169, 168.934218), // Tm
    (174, 173.938867), // Yb
    (175, 174.940777), // Lu
    (180, 179.946557), // Hf
    (181, 180.947999), // Ta
    (184, 183.950933), // W
    (187, 186.955752), // Re
    (192, 191.961477), // Os
    (193, 192.962942), // Ir
    (195, 194.9647911), // Pt
    (197, 196.966570), // Au
    (202, 201.970644), // Hg
    (205, 204.974427), // Tl
    (208, 207.976653), // Pb
    (209, 208.980399), // Bi
    (209, 208.982430), // Po
    (210, 209.987148), // At
    (222, 222.017578), // Rn
    (223, 223.019736), // Fr
    (226, 226.025410), // Ra
    (227, 227.027752), // Ac
    (232, 232.038055), // Th
    (231, 231.035884), // Pa
    (238, 238.050788), // U
    (237, 237.048174), // Np
    (244, 244.064205), // Pu
    (243, 243.061381), // Am
    (247, 247.070354), // Cm
    (247, 247.070307), // Bk
    (251, 251.079587), // Cf
    (252, 252.082980), // Es
    (257, 257.095106), // Fm
    (258, 258.098431), // Md
    (259, 259.101030), // No
    (266, 266.120), // Lr
    (267, 267.122), // Rf
    (268, 268.126), // Db
    (269, 269.129), // Sg
    (270, 270.133), // Bh
    (277, 277.150), // Hs
    (278, 278.156), // Mt
    (281, 281.165), // Ds
    (282, 282.169), // Rg
    (285, 285.177), // Cn
    (286, 286.183), // Nh
    (289, 289.190), // Fl
    (290, 290.196), // Mc
    (293, 293.205), // Lv
    (294, 294.211), // Ts
    (294, 294.214), // Og
];

/// `(atomic_number, mass_number, mass)` of further tabulated isotopes.
pub(super) static EXTRA_ISOTOPES: &[(u32, u32, f64)] = &[
    (1, 2, 2.01410177812),
    (1, 3, 3.0160492779),
    (2, 3, 3.0160293201),
    (3, 6, 6.0151228874),
    (5, 10, 10.01293695),
    (6, 13, 13.00335483507),
    (6, 14, 14.0032419884),
    (7, 15, 15.00010889888),
    (8, 17, 16.9991317565),
    (8, 18, 17.99915961286),
    (10, 21, 20.993846685),
    (10, 22, 21.991385114),
    (12, 25, 24.985836976),
    (12, 26, 25.982592968),
    (14, 29, 28.9764946649),
    (14, 30, 29.973770136),
    (16, 33, 32.9714589098),
    (16, 34, 33.967867004),
    (16, 36, 35.96708071),
    (17, 37, 36.965902602),
    (18, 36, 35.967545105),
    (18, 38, 37.96273211),
    (19, 40, 39.963998166),
    (19, 41, 40.9618252579),
    (20, 42, 41.95861783),
    (20, 43, 42.95876644),
    (20, 44, 43.95548156),
    (20, 46, 45.953689),
    (20, 48, 47.95252276),
    (26, 54, 53.93960899),
    (26, 57, 56.93539284),
    (26, 58, 57.93327443),
    (27, 57, 56.93629057),
    (27, 58, 57.9357521),
    (27, 60, 59.9338163),
    (27, 61, 60.93247662),
    (28, 60, 59.93078588),
    (28, 61, 60.93105557),
    (28, 62, 61.92834537),
    (28, 64, 63.92796682),
    (29, 65, 64.9277897),
    (30, 66, 65.92603381),
    (30, 67, 66.92712775),
    (30, 68, 67.92484455),
    (30, 70, 69.9253192),
    (35, 81, 80.9162897),
    (92, 234, 234.0409523),
    (92, 235, 235.0439301),
];
